use math::hcm::{Point3, Vec3};
use mesh::Mesh;
use scene::{IntersectionService, RayHit};

/// Progress of the ray casts for one sample. Transitions:
///
/// ```text
/// Init -> Outward -+-> Resolved                  (hit agrees with the sample normal)
///                  +-> Inward  -> Resolved       (outward miss)
///                  +-> Recast  -> Resolved       (hit faces away, not flipped yet)
/// ```
///
/// `Inward` and `Recast` both cast along `-normal` and are terminal: at most two casts happen per
/// sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastState {
    Init,
    Outward,
    Inward,
    Recast,
    Resolved(Option<DetailHit>),
}

/// A high-poly hit accepted for a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailHit {
    pub hit: RayHit,
    /// Interpolated and normalized high-poly vertex normal at the hit.
    pub normal: Vec3,
    /// Whether the accepted hit was found casting along `-normal`.
    pub flipped: bool,
}

/// What happened while resolving one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastOutcome {
    pub detail: Option<DetailHit>,
    pub num_casts: u32,
    pub recast: bool,
}

/// Finds the high-poly normal corresponding to a low-poly sample, casting rays in both directions
/// along the sample normal.
pub struct RayCaster<'a, S: IntersectionService + ?Sized> {
    scene: &'a S,
    hi_normals: &'a Mesh,
    t_min: f32,
    t_max: f32,
}

impl<'a, S: IntersectionService + ?Sized> RayCaster<'a, S> {
    /// `hi_normals` must be the mesh `scene` was built from: hit primitive ids index into it.
    pub fn new(scene: &'a S, hi_normals: &'a Mesh, t_min: f32, t_max: f32) -> Self {
        Self {
            scene,
            hi_normals,
            t_min,
            t_max,
        }
    }

    /// Runs the state machine to completion for a sample at `origin` with unit normal `normal`.
    pub fn resolve(&self, origin: Point3, normal: Vec3) -> CastOutcome {
        let mut state = CastState::Init;
        let mut num_casts = 0;
        let mut recast = false;
        loop {
            match state {
                CastState::Resolved(detail) => {
                    return CastOutcome {
                        detail,
                        num_casts,
                        recast,
                    }
                }
                CastState::Init => (),
                CastState::Outward | CastState::Inward => num_casts += 1,
                CastState::Recast => {
                    num_casts += 1;
                    recast = true;
                }
            }
            state = self.step(state, origin, normal);
        }
    }

    /// Performs one transition, casting a ray unless `state` is `Init` or `Resolved`.
    pub fn step(&self, state: CastState, origin: Point3, normal: Vec3) -> CastState {
        match state {
            CastState::Init => CastState::Outward,
            CastState::Outward => match self.cast(origin, normal) {
                None => CastState::Inward,
                Some((_, n_hi)) if n_hi.dot(normal) < 0.0 => CastState::Recast,
                Some((hit, n_hi)) => CastState::Resolved(Some(DetailHit {
                    hit,
                    normal: n_hi,
                    flipped: false,
                })),
            },
            CastState::Inward | CastState::Recast => {
                let detail = self.cast(origin, -normal).map(|(hit, n_hi)| DetailHit {
                    hit,
                    normal: n_hi,
                    flipped: true,
                });
                CastState::Resolved(detail)
            }
            CastState::Resolved(_) => state,
        }
    }

    /// Casts one ray and interpolates the high-poly normal at the hit. A hit whose vertex normals
    /// cancel out counts as a miss.
    fn cast(&self, origin: Point3, direction: Vec3) -> Option<(RayHit, Vec3)> {
        let hit = self
            .scene
            .cast_ray(origin, direction, self.t_min, self.t_max)?;
        let n_hi = self
            .hi_normals
            .interpolated_normal(hit.primitive_id, hit.u, hit.v)?;
        Some((hit, n_hi))
    }
}
