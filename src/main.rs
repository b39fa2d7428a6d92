mod cli_options;
mod fpmode;
mod image;

use anyhow::{Context, Result};
use baker::BakeConfig;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use scene::TriangleScene;

use cli_options::{parse_args, CliOptions};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match parse_args(std::env::args().collect()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: {}", CliOptions::message());
            std::process::exit(1);
        }
    };
    if options.show_help {
        println!("usage: {}", CliOptions::message());
        return;
    }
    if let Err(e) = run(&options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(options: &CliOptions) -> Result<()> {
    fpmode::init_process_fp_mode()?;

    let lo_mesh = mesh::load_mesh(&options.lo_mesh, true)
        .with_context(|| format!("loading low-poly mesh {}", options.lo_mesh.display()))?;
    let hi_mesh = mesh::load_mesh(&options.hi_mesh, false)
        .with_context(|| format!("loading high-poly mesh {}", options.hi_mesh.display()))?;
    info!("Low-poly: {}", lo_mesh);
    info!("High-poly: {}", hi_mesh);

    let start = std::time::Instant::now();
    let hi_scene = TriangleScene::build(&hi_mesh);
    info!("BVH built in {:.3} secs", start.elapsed().as_secs_f32());

    let config = BakeConfig::new(options.width, options.height, options.step)
        .with_margin(options.margin)
        .with_multi_thread(options.use_multi_thread);

    let progress = ProgressBar::new(lo_mesh.num_triangles() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:50} {pos}/{len} triangles ({eta})"),
    );
    let start = std::time::Instant::now();
    let (raster, _stats) =
        baker::bake_with_progress(&lo_mesh, &hi_scene, &hi_mesh, &config, &progress)?;
    progress.finish_and_clear();
    info!("Baked in {:.3} secs", start.elapsed().as_secs_f32());

    image::write_exr(&options.output, &raster)
}
