//! Flat C ABI over [`point_octree::SpatialOctree`].
//!
//! Points cross the boundary as packed `float[3]` triples. Every call
//! returns a status code (see [`Status`]); handles come from
//! [`point_octree_create`] and must be freed with [`point_octree_release`].
//!
//! ```c
//! void* tree = point_octree_create();
//! point_octree_build(tree, xyz, n, 10, 20);
//! int found = 0;
//! point_octree_points_within_sphere(tree, center, 2.0f, out, cap, &found);
//! point_octree_release(tree);
//! ```

use glam::Vec3;
use point_octree::{Error, SpatialOctree};

/// Status codes returned across the C boundary
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    InvalidArgument = -1,
    NullPointer = -2,
    Allocation = -3,
    /// Any other library error
    Internal = -4,
}

impl From<&Error> for Status {
    fn from(e: &Error) -> Self {
        match e {
            Error::InvalidArgument(_) => Status::InvalidArgument,
            Error::Allocation(_) => Status::Allocation,
            _ => Status::Internal,
        }
    }
}

impl From<Status> for i32 {
    fn from(s: Status) -> i32 {
        s as i32
    }
}

/// Allocate an empty tree handle
#[unsafe(no_mangle)]
pub extern "C" fn point_octree_create() -> *mut SpatialOctree {
    Box::into_raw(Box::new(SpatialOctree::new()))
}

/// Build `tree` from `count` packed xyz triples.
///
/// On failure the tree is left empty.
///
/// # Safety
/// `tree` must come from [`point_octree_create`] and not be used concurrently.
/// `points` must reference `3 * count` readable floats (may be null when `count == 0`).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn point_octree_build(
    tree: *mut SpatialOctree,
    points: *const f32,
    count: i32,
    max_levels: i32,
    min_points: i32,
) -> i32 {
    // SAFETY: caller guarantees `tree` is a live handle with no other users.
    let Some(tree) = (unsafe { tree.as_mut() }) else {
        return Status::NullPointer.into();
    };

    // SAFETY: pointer contract forwarded from the caller.
    let status = match unsafe { build_from_raw(tree, points, count, max_levels, min_points) } {
        Ok(()) => Status::Ok,
        Err(status) => {
            tree.release();
            status
        }
    };
    status.into()
}

unsafe fn build_from_raw(
    tree: &mut SpatialOctree,
    points: *const f32,
    count: i32,
    max_levels: i32,
    min_points: i32,
) -> Result<(), Status> {
    let count = usize::try_from(count).map_err(|_| Status::InvalidArgument)?;
    let max_depth = u32::try_from(max_levels).map_err(|_| Status::InvalidArgument)?;
    let min_points = u32::try_from(min_points).map_err(|_| Status::InvalidArgument)?;

    let floats: &[f32] = if count == 0 {
        &[]
    } else if points.is_null() {
        return Err(Status::NullPointer);
    } else {
        // SAFETY: caller guarantees `3 * count` readable floats.
        unsafe { std::slice::from_raw_parts(points, count * 3) }
    };
    let points: &[Vec3] = bytemuck::try_cast_slice(floats).map_err(|_| Status::InvalidArgument)?;

    tree.build(points, max_depth, min_points).map_err(|e| {
        log::warn!("point_octree_build failed: {}", e);
        Status::from(&e)
    })
}

/// Query the points within `radius` of `center`.
///
/// Writes up to `capacity` matches to `out_points` (packed xyz) and the total
/// number of matches to `out_count`. Call with `capacity == 0` to size a buffer.
///
/// # Safety
/// `tree` must come from [`point_octree_create`]; `center` must reference three
/// floats; `out_points` must have room for `3 * capacity` floats (may be null
/// when `capacity == 0`); `out_count` must be writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn point_octree_points_within_sphere(
    tree: *const SpatialOctree,
    center: *const f32,
    radius: f32,
    out_points: *mut f32,
    capacity: i32,
    out_count: *mut i32,
) -> i32 {
    // SAFETY: caller guarantees all non-null pointers are valid for the call.
    let (Some(tree), false, false) = (unsafe { tree.as_ref() }, center.is_null(), out_count.is_null()) else {
        return Status::NullPointer.into();
    };
    let Ok(capacity) = usize::try_from(capacity) else {
        return Status::InvalidArgument.into();
    };
    if capacity > 0 && out_points.is_null() {
        return Status::NullPointer.into();
    }

    // SAFETY: `center` references three floats.
    let center = Vec3::from_slice(unsafe { std::slice::from_raw_parts(center, 3) });

    let found = match tree.query_within_sphere(center, radius) {
        Ok(found) => found,
        Err(e) => return Status::from(&e).into(),
    };
    let Ok(total) = i32::try_from(found.len()) else {
        return Status::Internal.into();
    };

    let written = found.len().min(capacity);
    if written > 0 {
        // SAFETY: `out_points` has room for `3 * capacity` floats.
        let out = unsafe { std::slice::from_raw_parts_mut(out_points, written * 3) };
        out.copy_from_slice(bytemuck::cast_slice(&found[..written]));
    }
    // SAFETY: checked non-null above.
    unsafe { *out_count = total };

    Status::Ok.into()
}

/// Drop the tree's contents, keeping the handle usable. Null is a no-op.
///
/// # Safety
/// `tree` must be null or come from [`point_octree_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn point_octree_reset(tree: *mut SpatialOctree) {
    // SAFETY: caller guarantees a live handle or null.
    if let Some(tree) = unsafe { tree.as_mut() } {
        tree.release();
    }
}

/// Free a handle. Null is a no-op.
///
/// # Safety
/// `tree` must be null or come from [`point_octree_create`], and must not be
/// used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn point_octree_release(tree: *mut SpatialOctree) {
    if !tree.is_null() {
        // SAFETY: handle was produced by `Box::into_raw` in `point_octree_create`.
        drop(unsafe { Box::from_raw(tree) });
    }
}
