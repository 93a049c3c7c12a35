//! Modular angle helpers in degrees.
//!
//! Euler angles wrap: 90° is the same facing as 450° or -270°, and nothing
//! guarantees which representation a rotation decomposes into. A plain
//! `f32::clamp` on such values picks the wrong side of the wrap boundary, so
//! free-look clamps through [`clamp_angle`] instead.

/// Wraps `value` into `[0, length)`.
///
/// # Examples
/// ```
/// use gridstep::angle::repeat;
/// assert!((repeat(370.0, 360.0) - 10.0).abs() < 1e-4);
/// assert!((repeat(-90.0, 360.0) - 270.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn repeat(value: f32, length: f32) -> f32 {
    (value - (value / length).floor() * length).clamp(0.0, length)
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
///
/// # Examples
/// ```
/// use gridstep::angle::delta_angle;
/// assert!((delta_angle(350.0, 10.0) - 20.0).abs() < 1e-4);
/// assert!((delta_angle(10.0, 350.0) + 20.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Moves `current` toward `target` by at most `max_delta`.
#[must_use]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Like [`move_towards`], but travels the short way around the circle.
///
/// The result is expressed relative to `current`, so it may lie outside
/// `[0, 360)`.
#[must_use]
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if -max_delta < delta && delta < max_delta {
        return target;
    }
    move_towards(current, current + delta, max_delta)
}

/// Clamps `current` into the angular window `[min, max]`, respecting wrap.
///
/// The window's centre and half-width are found on the circle; a value
/// further than the half-width from the centre (by the shortest path) is
/// pulled back by exactly the excess. Values already inside the window are
/// returned untouched, whatever their representation.
///
/// # Examples
/// ```
/// use gridstep::angle::clamp_angle;
///
/// // The window 265°..435° straddles 0°/360°; 10° lies inside it.
/// assert!((clamp_angle(10.0, 265.0, 435.0) - 10.0).abs() < 1e-4);
/// // 90° is 15° past the upper edge (75°).
/// assert!((clamp_angle(90.0, 265.0, 435.0) - 75.0).abs() < 1e-3);
/// ```
#[must_use]
pub fn clamp_angle(current: f32, min: f32, max: f32) -> f32 {
    let width = (((min - max) + 180.0) % 360.0 - 180.0).abs();
    let half_width = width * 0.5;
    let centre = min + half_width;

    let excess = delta_angle(current, centre).abs() - half_width;
    if excess > 0.0 {
        move_towards_angle(current, centre, excess)
    } else {
        current
    }
}
