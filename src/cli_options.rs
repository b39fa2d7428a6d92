use std::path::PathBuf;
use std::str::FromStr;

/// The command line could not be turned into a bake.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("expected 3 positional arguments <lo.obj> <hi.obj> <out.exr>, got {0}")]
    PositionalCount(usize),
    #[error("unrecognized key {0}")]
    UnrecognizedKey(String),
    #[error("key {0} needs a value")]
    MissingValue(String),
    #[error("cannot parse {value:?} as the value of {key}")]
    BadValue { key: String, value: String },
}

pub struct CliOptions {
    pub use_multi_thread: bool,
    pub width: usize,
    pub height: usize,
    pub step: f32,
    pub margin: f32,
    pub show_help: bool,
    pub lo_mesh: PathBuf,
    pub hi_mesh: PathBuf,
    pub output: PathBuf,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            use_multi_thread: true,
            width: 2048,
            height: 2048,
            step: 0.01,
            margin: 0.01,
            show_help: false,
            lo_mesh: PathBuf::new(),
            hi_mesh: PathBuf::new(),
            output: PathBuf::new(),
        }
    }
}

impl CliOptions {
    pub fn message() -> &'static str {
        r#"normal-bake [options] <lo.obj> <hi.obj> <out.exr>
        --use_multi_thread | --use_single_thread
        --width <pixels>        (default 2048)
        --height <pixels>       (default 2048)
        --step <barycentric>    (default 0.01)
        --margin <barycentric>  (default 0.01)
        --help
        "#
    }
}

/// Parses `args` (including the program name at `args[0]`). With `--help`, the positional
/// arguments are not checked.
pub fn parse_args(args: Vec<String>) -> Result<CliOptions, ArgumentError> {
    let mut args = args.into_iter().rev().collect::<Vec<_>>();
    args.pop(); // Removes args[0]

    let mut options = CliOptions::default();
    let mut positionals = vec![];
    while let Some(key) = args.pop() {
        if !key.starts_with('-') {
            positionals.push(key);
            continue;
        }
        match key.as_str() {
            "--use_multi_thread" => options.use_multi_thread = true,
            "--use_single_thread" => options.use_multi_thread = false,
            "--width" => options.width = parse_value(&key, args.pop())?,
            "--height" => options.height = parse_value(&key, args.pop())?,
            "--step" => options.step = parse_value(&key, args.pop())?,
            "--margin" => options.margin = parse_value(&key, args.pop())?,
            "--help" => options.show_help = true,
            _ => return Err(ArgumentError::UnrecognizedKey(key)),
        }
    }
    if options.show_help {
        return Ok(options);
    }
    if positionals.len() != 3 {
        return Err(ArgumentError::PositionalCount(positionals.len()));
    }
    let mut positionals = positionals.into_iter().map(PathBuf::from);
    // The count was checked above.
    if let (Some(lo), Some(hi), Some(output)) =
        (positionals.next(), positionals.next(), positionals.next())
    {
        options.lo_mesh = lo;
        options.hi_mesh = hi;
        options.output = output;
    }
    Ok(options)
}

fn parse_value<T: FromStr>(key: &str, value: Option<String>) -> Result<T, ArgumentError> {
    let value = value.ok_or_else(|| ArgumentError::MissingValue(key.to_string()))?;
    value.parse().map_err(|_| ArgumentError::BadValue {
        key: key.to_string(),
        value,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn positionals_and_defaults() {
        let options = parse_args(args("normal-bake lo.obj hi.obj out.exr")).unwrap();
        assert_eq!(options.lo_mesh, PathBuf::from("lo.obj"));
        assert_eq!(options.hi_mesh, PathBuf::from("hi.obj"));
        assert_eq!(options.output, PathBuf::from("out.exr"));
        assert_eq!((options.width, options.height), (2048, 2048));
        assert_eq!(options.step, 0.01);
        assert!(options.use_multi_thread);
    }

    #[test]
    fn options_mix_with_positionals() {
        let line = "normal-bake --use_single_thread lo.obj --width 512 hi.obj --step 0.003 out.exr";
        let options = parse_args(args(line)).unwrap();
        assert!(!options.use_multi_thread);
        assert_eq!(options.width, 512);
        assert_eq!(options.height, 2048);
        assert_eq!(options.step, 0.003);
        assert_eq!(options.hi_mesh, PathBuf::from("hi.obj"));
    }

    #[test]
    fn wrong_positional_count_is_rejected() {
        for line in ["normal-bake", "normal-bake lo.obj hi.obj", "normal-bake a b c d"].iter() {
            assert!(
                matches!(parse_args(args(line)), Err(ArgumentError::PositionalCount(_))),
                "{}",
                line
            );
        }
    }

    #[test]
    fn bad_options_are_rejected() {
        assert!(matches!(
            parse_args(args("normal-bake --width lo.obj hi.obj out.exr")),
            Err(ArgumentError::BadValue { .. })
        ));
        assert!(matches!(
            parse_args(args("normal-bake lo.obj hi.obj out.exr --height")),
            Err(ArgumentError::MissingValue(_))
        ));
        assert!(matches!(
            parse_args(args("normal-bake --verbose lo.obj hi.obj out.exr")),
            Err(ArgumentError::UnrecognizedKey(_))
        ));
    }

    #[test]
    fn help_skips_positional_check() {
        let options = parse_args(args("normal-bake --help")).unwrap();
        assert!(options.show_help);
    }
}
