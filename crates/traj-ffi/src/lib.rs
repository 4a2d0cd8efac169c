//! C interface for TrajEngine.
//!
//! Every builder returns an owned handle (NULL on failure) that must be
//! released with the matching `*_free` function exactly once.
//! After a failure, `traj_last_error` describes what went wrong.
//!
//! Arrays are flat `double` arrays; counts are numbers of elements, not
//! numbers of `double`s. 2D/3D elements are 2/3 consecutive values, TCB
//! elements are 3 values (tension, continuity, bias). A NaN in `times`,
//! `speeds` or `slopes` means "not given".

use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::mem::{size_of, MaybeUninit};
use std::ptr;
use std::slice;

use bytemuck::Pod;
use glam::{DVec2, DVec3};
use traj_core::{Result, TrajError};
use traj_math::Vector;
use traj_spline::{AnimationSpline, Curve, MonotoneCubicSpline, PiecewiseCubicCurve, Tcb};

pub type TrajCurve1 = PiecewiseCubicCurve<f64>;
pub type TrajCurve2 = PiecewiseCubicCurve<DVec2>;
pub type TrajCurve3 = PiecewiseCubicCurve<DVec3>;
pub type TrajMonotoneCubic = MonotoneCubicSpline;
pub type TrajAnimationSpline1 = AnimationSpline<f64>;
pub type TrajAnimationSpline2 = AnimationSpline<DVec2>;
pub type TrajAnimationSpline3 = AnimationSpline<DVec3>;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_error(error: &TrajError) {
    log::debug!("traj-ffi: {error}");
    let message = CString::new(error.to_string()).unwrap_or_default();
    LAST_ERROR.with(|cell| *cell.borrow_mut() = Some(message));
}

fn into_handle<T>(result: Result<T>) -> Option<Box<T>> {
    match result {
        Ok(value) => Some(Box::new(value)),
        Err(error) => {
            set_error(&error);
            None
        }
    }
}

/// Message of the most recent failure on this thread, NULL if nothing failed.
///
/// The string is owned by the library and is replaced by the next failure,
/// so it has to be copied (or no longer used) before calling any other
/// function that may fail.
#[no_mangle]
pub extern "C" fn traj_last_error() -> *const c_char {
    LAST_ERROR.with(|cell| cell.borrow().as_ref().map_or(ptr::null(), |m| m.as_ptr()))
}

/// # Safety
///
/// Unless `count` is zero or `data` is NULL, `data` must be valid for
/// reading `count` elements.
unsafe fn input_slice<'a, T>(data: *const T, count: usize) -> &'a [T] {
    if data.is_null() || count == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(data, count) }
    }
}

/// Number of `double`s in one element of type `T`.
const fn width<T>() -> usize {
    size_of::<T>() / size_of::<f64>()
}

/// # Safety
///
/// See [`input_slice`], with `count` elements of `width::<V>()` doubles each.
unsafe fn input_vectors<'a, V: Pod>(data: *const f64, count: usize) -> Result<&'a [V]> {
    let values = count
        .checked_mul(width::<V>())
        .ok_or_else(|| TrajError::InvalidInput(format!("too many elements: {count}")))?;
    let flat = unsafe { input_slice(data, values) };
    bytemuck::try_cast_slice(flat).map_err(|e| TrajError::InvalidInput(e.to_string()))
}

/// # Safety
///
/// See [`input_slice`].
unsafe fn input_optional(data: *const f64, count: usize) -> Vec<Option<f64>> {
    unsafe { input_slice(data, count) }
        .iter()
        .map(|&x| (!x.is_nan()).then_some(x))
        .collect()
}

/// # Safety
///
/// See [`input_slice`], with 3 doubles per element.
unsafe fn input_tcb(data: *const f64, count: usize) -> Result<Vec<Tcb>> {
    let triples: &[[f64; 3]] = unsafe { input_vectors(data, count) }?;
    Ok(triples.iter().map(|&tcb| Tcb::from(tcb)).collect())
}

/// # Safety
///
/// Unless `count` is zero, `output` must be valid for writing `count`
/// elements of type `V`.
unsafe fn write_output<V: Pod>(values: impl Iterator<Item = V>, output: *mut f64, count: usize) {
    if output.is_null() || count == 0 {
        return;
    }
    let output = unsafe { slice::from_raw_parts_mut(output.cast::<MaybeUninit<V>>(), count) };
    for (value, out) in values.zip(output) {
        out.write(value);
    }
}

unsafe fn build_kochanek_bartels<V: Vector + Pod>(
    positions: *const f64,
    positions_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Result<PiecewiseCubicCurve<V>> {
    let positions = unsafe { input_vectors::<V>(positions, positions_count) }?;
    let tcb = unsafe { input_tcb(tcb, tcb_count) }?;
    PiecewiseCubicCurve::new_centripetal_kochanek_bartels(positions, &tcb, closed)
}

#[allow(clippy::too_many_arguments)]
unsafe fn build_animation_spline<V: Vector + Pod>(
    positions: *const f64,
    positions_count: usize,
    times: *const f64,
    times_count: usize,
    speeds: *const f64,
    speeds_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Result<AnimationSpline<V>> {
    let positions = unsafe { input_vectors::<V>(positions, positions_count) }?;
    let times = unsafe { input_optional(times, times_count) };
    let speeds = unsafe { input_optional(speeds, speeds_count) };
    let tcb = unsafe { input_tcb(tcb, tcb_count) }?;
    AnimationSpline::new(positions, &times, &speeds, &tcb, closed)
}

/// Evaluation, grid access and release for one handle type.
macro_rules! handle_functions {
    ($handle:ty, $value:ty, $evaluate:ident, $grid:ident, $free:ident) => {
        /// Writes the values at the given parameters to `output`.
        ///
        /// Parameters outside of the grid are clamped.
        ///
        /// # Safety
        ///
        /// `times` must be valid for `count` doubles, `output` must provide
        /// space for `count` elements (1, 2 or 3 doubles each, depending on
        /// the handle type).
        #[no_mangle]
        pub unsafe extern "C" fn $evaluate(
            handle: &$handle,
            times: *const f64,
            count: usize,
            output: *mut f64,
        ) {
            let times = unsafe { input_slice(times, count) };
            let values = times.iter().map(|&t| -> $value { handle.evaluate(t) });
            unsafe { write_output(values, output, count) };
        }

        /// Provides a pointer to the grid and returns its number of elements.
        ///
        /// The grid stays valid until the handle is freed.
        ///
        /// # Safety
        ///
        /// `output` must be valid for writing one pointer (or NULL).
        #[no_mangle]
        pub unsafe extern "C" fn $grid(handle: &$handle, output: *mut *const f64) -> usize {
            let grid = handle.grid();
            if !output.is_null() {
                unsafe { output.write(grid.as_ptr()) };
            }
            grid.len()
        }

        /// Releases a handle. Passing NULL is allowed.
        ///
        /// # Safety
        ///
        /// The handle must have been created by this library and must not be
        /// used (or freed) afterwards.
        #[no_mangle]
        pub unsafe extern "C" fn $free(_: Option<Box<$handle>>) {}
    };
}

handle_functions!(TrajCurve1, f64, traj_curve1_evaluate, traj_curve1_grid, traj_curve1_free);
handle_functions!(TrajCurve2, DVec2, traj_curve2_evaluate, traj_curve2_grid, traj_curve2_free);
handle_functions!(TrajCurve3, DVec3, traj_curve3_evaluate, traj_curve3_grid, traj_curve3_free);
handle_functions!(
    TrajMonotoneCubic,
    f64,
    traj_monotonecubic_evaluate,
    traj_monotonecubic_grid,
    traj_monotonecubic_free
);
handle_functions!(
    TrajAnimationSpline1,
    f64,
    traj_animationspline1_evaluate,
    traj_animationspline1_grid,
    traj_animationspline1_free
);
handle_functions!(
    TrajAnimationSpline2,
    DVec2,
    traj_animationspline2_evaluate,
    traj_animationspline2_grid,
    traj_animationspline2_free
);
handle_functions!(
    TrajAnimationSpline3,
    DVec3,
    traj_animationspline3_evaluate,
    traj_animationspline3_grid,
    traj_animationspline3_free
);

/// Creates a one-dimensional centripetal Kochanek-Bartels curve.
///
/// # Safety
///
/// `positions` must be valid for `positions_count` doubles,
/// `tcb` for `3 * tcb_count` doubles (or NULL if `tcb_count` is zero).
#[no_mangle]
pub unsafe extern "C" fn traj_kochanekbartels1(
    positions: *const f64,
    positions_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Option<Box<TrajCurve1>> {
    into_handle(unsafe { build_kochanek_bartels(positions, positions_count, tcb, tcb_count, closed) })
}

/// Creates a two-dimensional centripetal Kochanek-Bartels curve.
///
/// # Safety
///
/// `positions` must be valid for `2 * positions_count` doubles,
/// `tcb` for `3 * tcb_count` doubles (or NULL if `tcb_count` is zero).
#[no_mangle]
pub unsafe extern "C" fn traj_kochanekbartels2(
    positions: *const f64,
    positions_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Option<Box<TrajCurve2>> {
    into_handle(unsafe { build_kochanek_bartels(positions, positions_count, tcb, tcb_count, closed) })
}

/// Creates a three-dimensional centripetal Kochanek-Bartels curve.
///
/// # Safety
///
/// `positions` must be valid for `3 * positions_count` doubles,
/// `tcb` for `3 * tcb_count` doubles (or NULL if `tcb_count` is zero).
#[no_mangle]
pub unsafe extern "C" fn traj_kochanekbartels3(
    positions: *const f64,
    positions_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Option<Box<TrajCurve3>> {
    into_handle(unsafe { build_kochanek_bartels(positions, positions_count, tcb, tcb_count, closed) })
}

/// Creates a one-dimensional shape-preserving curve.
///
/// `slopes` may be NULL (with `slopes_count` zero); NaN slopes are chosen
/// automatically. Closed curves need one more grid value than values.
///
/// # Safety
///
/// All pointers must be valid for their `*_count` doubles.
#[no_mangle]
pub unsafe extern "C" fn traj_piecewisemonotone(
    values: *const f64,
    values_count: usize,
    slopes: *const f64,
    slopes_count: usize,
    grid: *const f64,
    grid_count: usize,
    closed: bool,
) -> Option<Box<TrajCurve1>> {
    let values = unsafe { input_slice(values, values_count) };
    let slopes = unsafe { input_optional(slopes, slopes_count) };
    let grid = unsafe { input_slice(grid, grid_count) };
    into_handle(PiecewiseCubicCurve::new_piecewise_monotone_with_slopes(
        values, &slopes, grid, closed,
    ))
}

/// Creates a monotone (non-decreasing) cubic spline.
///
/// `slopes` may be NULL (with `slopes_count` zero); NaN slopes are chosen
/// automatically.
///
/// # Safety
///
/// All pointers must be valid for their `*_count` doubles.
#[no_mangle]
pub unsafe extern "C" fn traj_monotonecubic(
    values: *const f64,
    values_count: usize,
    slopes: *const f64,
    slopes_count: usize,
    grid: *const f64,
    grid_count: usize,
) -> Option<Box<TrajMonotoneCubic>> {
    let values = unsafe { input_slice(values, values_count) };
    let slopes = unsafe { input_optional(slopes, slopes_count) };
    let grid = unsafe { input_slice(grid, grid_count) };
    into_handle(MonotoneCubicSpline::with_slopes(values, &slopes, grid))
}

/// Writes the grid parameters at which the given values are reached.
///
/// Values that cannot be inverted (out of range, or on a plateau) produce
/// NaN and set the last error.
///
/// # Safety
///
/// `values` must be valid for `count` doubles, `output` must provide space
/// for `count` doubles.
#[no_mangle]
pub unsafe extern "C" fn traj_monotonecubic_invert(
    spline: &TrajMonotoneCubic,
    values: *const f64,
    count: usize,
    output: *mut f64,
) {
    let values = unsafe { input_slice(values, count) };
    let times = values.iter().map(|&value| {
        spline.invert(value).unwrap_or_else(|error| {
            set_error(&error);
            f64::NAN
        })
    });
    unsafe { write_output(times, output, count) };
}

/// Creates a one-dimensional animation spline.
///
/// `times` has one element per position (one more if `closed`), `speeds`
/// one element per position; both may be NULL with a count of zero.
///
/// # Safety
///
/// `positions` must be valid for `positions_count` doubles, `tcb` for
/// `3 * tcb_count` doubles, the other pointers for their `*_count` doubles.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn traj_animationspline1(
    positions: *const f64,
    positions_count: usize,
    times: *const f64,
    times_count: usize,
    speeds: *const f64,
    speeds_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Option<Box<TrajAnimationSpline1>> {
    into_handle(unsafe {
        build_animation_spline(
            positions,
            positions_count,
            times,
            times_count,
            speeds,
            speeds_count,
            tcb,
            tcb_count,
            closed,
        )
    })
}

/// Creates a two-dimensional animation spline.
///
/// # Safety
///
/// `positions` must be valid for `2 * positions_count` doubles, `tcb` for
/// `3 * tcb_count` doubles, the other pointers for their `*_count` doubles.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn traj_animationspline2(
    positions: *const f64,
    positions_count: usize,
    times: *const f64,
    times_count: usize,
    speeds: *const f64,
    speeds_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Option<Box<TrajAnimationSpline2>> {
    into_handle(unsafe {
        build_animation_spline(
            positions,
            positions_count,
            times,
            times_count,
            speeds,
            speeds_count,
            tcb,
            tcb_count,
            closed,
        )
    })
}

/// Creates a three-dimensional animation spline.
///
/// # Safety
///
/// `positions` must be valid for `3 * positions_count` doubles, `tcb` for
/// `3 * tcb_count` doubles, the other pointers for their `*_count` doubles.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn traj_animationspline3(
    positions: *const f64,
    positions_count: usize,
    times: *const f64,
    times_count: usize,
    speeds: *const f64,
    speeds_count: usize,
    tcb: *const f64,
    tcb_count: usize,
    closed: bool,
) -> Option<Box<TrajAnimationSpline3>> {
    into_handle(unsafe {
        build_animation_spline(
            positions,
            positions_count,
            times,
            times_count,
            speeds,
            speeds_count,
            tcb,
            tcb_count,
            closed,
        )
    })
}
