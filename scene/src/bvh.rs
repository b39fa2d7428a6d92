use std::cmp::Ordering;
use std::ops::Range;

use geometry::bvh::{self, BBox};
use geometry::ray::Ray;
use math::hcm::{Point3, Vec3};
use mesh::Mesh;
use partition::partition;

use crate::{intersect_triangle, IntersectionService, RayHit};

enum BvhNodeContent {
    Children([Box<BvhNode>; 2], usize),
    Leaf(Range<usize>),
}

struct BvhNode {
    bbox: BBox,
    content: BvhNodeContent,
}

use BvhNodeContent::Children;
use BvhNodeContent::Leaf;

impl BvhNode {
    fn height(&self) -> usize {
        match &self.content {
            Children([left, right], _) => std::cmp::max(left.height(), right.height()) + 1,
            Leaf(_) => 1,
        }
    }
    fn count(&self) -> usize {
        match &self.content {
            Children([left, right], _) => left.count() + right.count() + 1,
            Leaf(_) => 1,
        }
    }
}

/// One triangle of the scene. `id` is its index in the source mesh; the BVH build reorders the
/// scene triangles, so the id is what ray hits report.
#[derive(Debug)]
struct SceneTriangle {
    id: usize,
    corners: (Point3, Point3, Point3),
    bbox: BBox,
}

/// The high-poly mesh geometry organized with a bounding-volume hierarchy.
///
/// Only positions are copied from the mesh; normals are looked up in the mesh afterwards with the
/// hit's `primitive_id`.
pub struct TriangleScene {
    triangles: Vec<SceneTriangle>,
    bvh_root: Option<BvhNode>,
}

impl TriangleScene {
    pub fn build(mesh: &Mesh) -> Self {
        let mut triangles = (0..mesh.num_triangles())
            .map(|id| {
                let corners = mesh.triangle_positions(id);
                let (p0, p1, p2) = corners;
                SceneTriangle {
                    id,
                    corners,
                    bbox: BBox::new(p0, p1).union(p2),
                }
            })
            .collect::<Vec<_>>();
        let num_triangles = triangles.len();
        let bvh_root = if num_triangles == 0 {
            None
        } else {
            Some(recursive_build(&mut triangles, 0..num_triangles, |t: &SceneTriangle| {
                t.bbox
            }))
        };
        let scene = Self {
            triangles,
            bvh_root,
        };
        log::info!("Built {}", scene.summary());
        scene
    }

    pub fn bbox(&self) -> BBox {
        match &self.bvh_root {
            None => BBox::empty(),
            Some(node) => node.bbox,
        }
    }

    pub fn bvh_shape_summary(&self) -> String {
        match &self.bvh_root {
            None => String::from("empty"),
            Some(bvh) => format!("height = {}, node count = {}", bvh.height(), bvh.count()),
        }
    }
}

impl IntersectionService for TriangleScene {
    fn summary(&self) -> String {
        format!(
            "TriangleScene{{{} triangles, bbox = {}, bvh = {}}}",
            self.triangles.len(),
            self.bbox(),
            self.bvh_shape_summary()
        )
    }

    fn cast_ray(&self, origin: Point3, direction: Vec3, t_min: f32, t_max: f32) -> Option<RayHit> {
        let tree = self.bvh_root.as_ref()?;
        let mut ray = Ray::new(origin, direction).with_extent(t_min, t_max);

        let mut node_stack = Vec::with_capacity(64);
        node_stack.push(tree);

        let mut closest = None;
        while let Some(node) = node_stack.pop() {
            if !node.bbox.intersect(&ray) {
                continue;
            }
            match &node.content {
                Leaf(range) => {
                    // Ranges are not `Copy`: https://github.com/rust-lang/rust/pull/27186
                    for tri in self.triangles[range.clone()].iter() {
                        let (p0, p1, p2) = tri.corners;
                        if let Some(hit) = intersect_triangle(p0, p1, p2, &ray) {
                            // Later hits must be strictly closer than this one.
                            ray.set_extent(hit.t);
                            closest = Some(RayHit {
                                primitive_id: tri.id,
                                u: hit.u,
                                v: hit.v,
                                t: hit.t,
                            });
                        }
                    }
                }
                Children([left, right], axis) => {
                    // which one is farther away?
                    if ray.dir[*axis] > 0.0 {
                        // Ray roughly intersects left first.
                        node_stack.push(right);
                        node_stack.push(left);
                    } else {
                        node_stack.push(left);
                        node_stack.push(right);
                    }
                }
            }
        }
        closest
    }
}

fn by_axis(axis: usize) -> impl Fn(&BBox, &BBox) -> Ordering {
    move |b0: &BBox, b1: &BBox| {
        b0.midpoint()[axis]
            .partial_cmp(&b1.midpoint()[axis])
            .unwrap_or(Ordering::Equal)
    }
}

fn recursive_build<S, F>(shapes: &mut [S], range: Range<usize>, box_getter: F) -> BvhNode
where
    F: Fn(&S) -> BBox + Copy,
{
    if range.len() <= 4 {
        let bbox = shapes[range.clone()]
            .iter()
            .fold(BBox::empty(), |b, shape| bvh::union(b, box_getter(shape)));
        return BvhNode {
            bbox,
            content: Leaf(range),
        };
    }

    let mut bboxes: Vec<_> = shapes[range.clone()].iter().map(box_getter).collect();
    let centroid_bbox = bboxes
        .iter()
        .fold(BBox::empty(), |sum, b| sum.union(b.midpoint()));
    let split_axis = centroid_bbox.diag().max_dimension();
    if centroid_bbox.diag()[split_axis] < 1e-8 {
        log::debug!("Creating a tiny leaf node with {} triangles", range.len());
        return BvhNode {
            bbox: bboxes
                .iter()
                .fold(BBox::empty(), |b0, b1| bvh::union(b0, *b1)),
            content: Leaf(range),
        };
    }

    // Computes the plane "axis = pivot_value" that will be used to partition the shapes.
    // ----------------------------------------------------------------------------------

    // Sorts the bounding boxes according to coordinate value on the computed axis.
    bboxes.sort_by(by_axis(split_axis));

    let bbox_area_sum: f32 = bboxes.iter().map(|b| b.area()).sum();
    let surface_area_heuristic_pivot = bbox_area_sum * 0.5;

    let mut partial_sum = 0.0;
    let mut split_index = 0;
    for (i, b) in bboxes.iter().enumerate() {
        partial_sum += b.area();
        if partial_sum >= surface_area_heuristic_pivot {
            split_index = i;
            break;
        }
    }

    let pivot_value = bboxes[split_index].midpoint()[split_axis];

    // Partitions the set of shapes w.r.t. their bounding box midpoint coordinate on the split axis.
    let (left, right) = partition(&mut shapes[range.clone()], |s| {
        box_getter(s).midpoint()[split_axis] <= pivot_value
    });
    let mut mid_point = left.len() + range.start;
    debug_assert_eq!(range.end - mid_point, right.len());

    if left.is_empty() || right.is_empty() {
        let by_midpoint = by_axis(split_axis);
        shapes[range.clone()].select_nth_unstable_by(range.len() / 2, |s0, s1| {
            by_midpoint(&box_getter(s0), &box_getter(s1))
        });
        mid_point = range.start + range.len() / 2;
    }

    let left_child = recursive_build(shapes, range.start..mid_point, box_getter);
    let right_child = recursive_build(shapes, mid_point..range.end, box_getter);

    BvhNode {
        bbox: bvh::union(left_child.bbox, right_child.bbox),
        content: Children([Box::new(left_child), Box::new(right_child)], split_axis),
    }
}
