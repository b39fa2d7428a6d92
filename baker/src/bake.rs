use std::fmt::{Display, Formatter};
use std::ops::{Add, Range};

use indicatif::ProgressBar;
use log::{debug, info, warn};
use mesh::Mesh;
use rayon::prelude::*;
use scene::IntersectionService;

use crate::accumulate::{AccumulationBuffer, Raster};
use crate::cast::RayCaster;
use crate::config::{BakeConfig, BakeError};
use crate::frame::TangentFrameBuilder;
use crate::sampler::samples;

/// Counters collected during a bake.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BakeStats {
    pub triangles: usize,
    /// Triangles skipped because they have no area in uv space.
    pub degenerate_triangles: usize,
    /// Samples with a valid tangent frame, for which rays were cast.
    pub samples: usize,
    pub hits: usize,
    pub misses: usize,
    /// Samples whose first hit faced away from the low-poly normal.
    pub recasts: usize,
    pub texels_covered: usize,
}

impl Add for BakeStats {
    type Output = BakeStats;
    fn add(self, rhs: Self) -> Self {
        BakeStats {
            triangles: self.triangles + rhs.triangles,
            degenerate_triangles: self.degenerate_triangles + rhs.degenerate_triangles,
            samples: self.samples + rhs.samples,
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
            recasts: self.recasts + rhs.recasts,
            texels_covered: self.texels_covered + rhs.texels_covered,
        }
    }
}

impl Display for BakeStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} triangles ({} degenerate), {} samples, {} hits, {} misses, {} recasts, {} texels covered",
            self.triangles,
            self.degenerate_triangles,
            self.samples,
            self.hits,
            self.misses,
            self.recasts,
            self.texels_covered
        )
    }
}

/// Bakes the normals of the high-poly mesh into the tangent space of the low-poly mesh's uv layout.
///
/// `hi_scene` must be built over `hi_normals`. Texels no sample reaches keep the flat-normal
/// background value.
pub fn bake<S>(
    lo_mesh: &Mesh, hi_scene: &S, hi_normals: &Mesh, config: &BakeConfig,
) -> Result<(Raster, BakeStats), BakeError>
where
    S: IntersectionService + ?Sized,
{
    bake_with_progress(lo_mesh, hi_scene, hi_normals, config, &ProgressBar::hidden())
}

/// Same as `bake()`, advancing `progress` by one for each low-poly triangle.
pub fn bake_with_progress<S>(
    lo_mesh: &Mesh, hi_scene: &S, hi_normals: &Mesh, config: &BakeConfig,
    progress: &ProgressBar,
) -> Result<(Raster, BakeStats), BakeError>
where
    S: IntersectionService + ?Sized,
{
    config.validate()?;
    if lo_mesh.num_triangles() > 0 && !lo_mesh.has_uvs() {
        return Err(BakeError::MissingUvs);
    }
    let num_triangles = lo_mesh.num_triangles();
    progress.set_length(num_triangles as u64);
    info!(
        "Baking {} low-poly triangles against {} into {}x{} texels (step = {}, margin = {})",
        num_triangles,
        hi_scene.summary(),
        config.width,
        config.height,
        config.sampling_step,
        config.margin
    );

    let caster = RayCaster::new(hi_scene, hi_normals, config.ray_t_min, config.ray_t_max);
    let (buffer, mut stats) = if config.multi_thread {
        // Each chunk of triangles accumulates into a private buffer; the buffers are summed up
        // afterwards, so no texel is ever written by two threads.
        let num_chunks = rayon::current_num_threads().max(1);
        let chunk_size = ((num_triangles + num_chunks - 1) / num_chunks).max(1);
        debug!("Splitting the bake into chunks of {} triangles", chunk_size);
        let chunks = (0..num_triangles)
            .step_by(chunk_size)
            .map(|start| start..(start + chunk_size).min(num_triangles))
            .collect::<Vec<_>>();
        chunks
            .into_par_iter()
            .map(|range| bake_triangles(range, lo_mesh, &caster, config, progress))
            .reduce(
                || (AccumulationBuffer::new(config.width, config.height), BakeStats::default()),
                |(mut buffer, stats), (other_buffer, other_stats)| {
                    buffer.merge(&other_buffer);
                    (buffer, stats + other_stats)
                },
            )
    } else {
        bake_triangles(0..num_triangles, lo_mesh, &caster, config, progress)
    };

    stats.texels_covered = buffer.covered_count();
    info!("Bake finished: {}", stats);
    Ok((buffer.resolve(), stats))
}

fn bake_triangles<S>(
    range: Range<usize>, lo_mesh: &Mesh, caster: &RayCaster<S>, config: &BakeConfig,
    progress: &ProgressBar,
) -> (AccumulationBuffer, BakeStats)
where
    S: IntersectionService + ?Sized,
{
    let mut buffer = AccumulationBuffer::new(config.width, config.height);
    let mut stats = BakeStats::default();
    for index in range {
        bake_triangle(index, lo_mesh, caster, config, &mut buffer, &mut stats);
        progress.inc(1);
    }
    (buffer, stats)
}

fn bake_triangle<S>(
    index: usize, lo_mesh: &Mesh, caster: &RayCaster<S>, config: &BakeConfig,
    buffer: &mut AccumulationBuffer, stats: &mut BakeStats,
) where
    S: IntersectionService + ?Sized,
{
    stats.triangles += 1;
    let builder = match TangentFrameBuilder::new(lo_mesh.triangle(index), config.uv_epsilon) {
        Ok(builder) => builder,
        Err(e) => {
            warn!("Skipping low-poly triangle {}: {}", index, e);
            stats.degenerate_triangles += 1;
            return;
        }
    };
    for bc in samples(config.sampling_step, config.margin) {
        let sample = match builder.surface_at(bc) {
            Some(sample) => sample,
            None => continue,
        };
        let frame = match builder.frame_at(&sample) {
            Some(frame) => frame,
            None => continue,
        };
        stats.samples += 1;

        let outcome = caster.resolve(sample.position, sample.normal);
        if outcome.recast {
            stats.recasts += 1;
        }
        let detail = match outcome.detail {
            Some(detail) => detail,
            None => {
                stats.misses += 1;
                continue;
            }
        };
        stats.hits += 1;
        if let Some((x, y)) = buffer.texel_of(sample.uv) {
            buffer.accumulate(x, y, frame.to_local(detail.normal));
        }
    }
}
