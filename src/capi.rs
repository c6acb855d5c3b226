//! C entry points, for engines that host the wrapper as a shared library.

use crate::config::WrapperConfig;
use crate::hand::{Hand, HandKeypoints, KEYPOINT_COUNT};
use crate::provider::{FeatureRegistry, HandTracker, LeapWrapperCallback, WorldClock};
use crate::wrapper::{OpenXrToLeapWrapper, WrapperState};
use glam::{Quat, Vec3};
use leapc::{LEAP_DEVICE_INFO, LEAP_TRACKING_EVENT};
use log::{info, warn};
use openxr_sys as xr;
use std::ffi::{c_char, c_void, CStr, CString};

/// Functions the host provides to the wrapper. Every function is optional and receives
/// `user_data` as its first argument.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct XrLeapHost {
    pub user_data: *mut c_void,
    pub load_module: Option<unsafe extern "C" fn(user_data: *mut c_void, name: *const c_char)>,
    /// Without this, the hand tracker counts as available if `get_all_keypoint_states` is set.
    pub is_feature_available:
        Option<unsafe extern "C" fn(user_data: *mut c_void, name: *const c_char) -> bool>,
    /// Writes at most `capacity` keypoints of `hand` in engine space and stores the number
    /// written in `count`. Returns whether the hand is tracked.
    pub get_all_keypoint_states: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            hand: xr::HandEXT,
            positions: *mut [f32; 3],
            rotations: *mut [f32; 4],
            radii: *mut f32,
            capacity: u32,
            count: *mut u32,
        ) -> bool,
    >,
    /// Returns false if no world is available.
    pub time_seconds:
        Option<unsafe extern "C" fn(user_data: *mut c_void, seconds: *mut f64) -> bool>,
    pub on_device_found:
        Option<unsafe extern "C" fn(user_data: *mut c_void, device: *const LEAP_DEVICE_INFO)>,
}

impl XrLeapHost {
    const EMPTY: Self = Self {
        user_data: std::ptr::null_mut(),
        load_module: None,
        is_feature_available: None,
        get_all_keypoint_states: None,
        time_seconds: None,
        on_device_found: None,
    };
}

struct HostRegistry(XrLeapHost);
struct HostHandTracker(XrLeapHost);
struct HostClock(XrLeapHost);
struct HostCallback(XrLeapHost);

fn c_string(s: &str) -> Option<CString> {
    CString::new(s)
        .inspect_err(|_| warn!("{s:?} contains a nul byte"))
        .ok()
}

impl FeatureRegistry for HostRegistry {
    type Tracker = HostHandTracker;

    fn load_module(&self, name: &str) {
        let (Some(load_module), Some(name)) = (self.0.load_module, c_string(name)) else {
            return;
        };
        unsafe { load_module(self.0.user_data, name.as_ptr()) };
    }

    fn find_hand_tracker(&self, feature_name: &str) -> Option<Self::Tracker> {
        if self.0.get_all_keypoint_states.is_none() {
            return None;
        }

        let available = match self.0.is_feature_available {
            Some(is_available) => {
                let name = c_string(feature_name)?;
                unsafe { is_available(self.0.user_data, name.as_ptr()) }
            }
            None => true,
        };
        available.then_some(HostHandTracker(self.0))
    }
}

impl HandTracker for HostHandTracker {
    fn get_all_keypoint_states(&self, hand: Hand, keypoints: &mut HandKeypoints) -> bool {
        let Some(get_states) = self.0.get_all_keypoint_states else {
            return false;
        };

        let mut positions = [[0.0; 3]; KEYPOINT_COUNT];
        let mut rotations = [[0.0, 0.0, 0.0, 1.0]; KEYPOINT_COUNT];
        let mut radii = [0.0; KEYPOINT_COUNT];
        let mut count = 0;

        let tracked = unsafe {
            get_states(
                self.0.user_data,
                hand.into(),
                positions.as_mut_ptr(),
                rotations.as_mut_ptr(),
                radii.as_mut_ptr(),
                KEYPOINT_COUNT as u32,
                &mut count,
            )
        };
        if !tracked {
            return false;
        }

        let count = (count as usize).min(KEYPOINT_COUNT);
        let samples = positions.iter().zip(&rotations).zip(&radii).take(count);
        for ((position, rotation), radius) in samples {
            keypoints.push(
                Vec3::from_array(*position),
                Quat::from_array(*rotation),
                *radius,
            );
        }
        true
    }
}

impl WorldClock for HostClock {
    fn time_seconds(&self) -> f64 {
        let Some(time_seconds) = self.0.time_seconds else {
            return 0.0;
        };
        let mut seconds = 0.0;
        if unsafe { time_seconds(self.0.user_data, &mut seconds) } {
            seconds
        } else {
            0.0
        }
    }
}

impl LeapWrapperCallback for HostCallback {
    fn on_device_found(&self, device: &LEAP_DEVICE_INFO) {
        if let Some(on_device_found) = self.0.on_device_found {
            unsafe { on_device_found(self.0.user_data, device) };
        }
    }
}

/// Opaque handle handed to C.
pub struct XrLeapWrapper {
    host: XrLeapHost,
    inner: OpenXrToLeapWrapper<HostRegistry>,
}

/// Creates a wrapper. `config_json` may be null, in which case the configuration is read from the
/// file named by `XRLEAP_CONFIG` (or defaulted).
///
/// # Safety
///
/// `host` must be null or point to a valid `XrLeapHost` whose functions stay callable for the
/// wrapper's lifetime. `config_json` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn xrleap_create(
    host: *const XrLeapHost,
    config_json: *const c_char,
) -> *mut XrLeapWrapper {
    crate::init_logging();

    let host = unsafe { host.as_ref() }
        .copied()
        .unwrap_or(XrLeapHost::EMPTY);

    let config = if config_json.is_null() {
        WrapperConfig::load()
    } else {
        let json = unsafe { CStr::from_ptr(config_json) }.to_string_lossy();
        WrapperConfig::from_json(&json).unwrap_or_else(|e| {
            warn!("Invalid config, using defaults: {e:?}");
            WrapperConfig::default()
        })
    };

    let mut inner = OpenXrToLeapWrapper::new(HostRegistry(host), config);
    if host.time_seconds.is_some() {
        inner.set_clock(Some(Box::new(HostClock(host))));
    }

    info!("Created wrapper");
    Box::into_raw(Box::new(XrLeapWrapper { host, inner }))
}

/// # Safety
///
/// `wrapper` must be null or come from `xrleap_create`, and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn xrleap_destroy(wrapper: *mut XrLeapWrapper) {
    if !wrapper.is_null() {
        drop(unsafe { Box::from_raw(wrapper) });
    }
}

/// Binds the wrapper to the host's hand tracker and reports the device through
/// `on_device_found`. Returns whether a hand tracker is bound.
///
/// # Safety
///
/// `wrapper` must be null or a live wrapper from `xrleap_create`.
#[no_mangle]
pub unsafe extern "C" fn xrleap_open_connection(wrapper: *mut XrLeapWrapper) -> bool {
    let Some(wrapper) = (unsafe { wrapper.as_mut() }) else {
        return false;
    };

    let callback = wrapper
        .host
        .on_device_found
        .map(|_| Box::new(HostCallback(wrapper.host)) as Box<dyn LeapWrapperCallback>);
    wrapper.inner.open_connection(callback) == WrapperState::Bound
}

/// The returned event, and the hands it points to, stay valid until the next frame query or until
/// the wrapper is destroyed.
///
/// # Safety
///
/// `wrapper` must be null or a live wrapper from `xrleap_create`.
#[no_mangle]
pub unsafe extern "C" fn xrleap_get_frame(
    wrapper: *mut XrLeapWrapper,
) -> *const LEAP_TRACKING_EVENT {
    match unsafe { wrapper.as_mut() } {
        Some(wrapper) => wrapper.inner.get_frame().event(),
        None => std::ptr::null(),
    }
}

/// Same as `xrleap_get_frame`, `timestamp` is ignored.
///
/// # Safety
///
/// `wrapper` must be null or a live wrapper from `xrleap_create`.
#[no_mangle]
pub unsafe extern "C" fn xrleap_get_interpolated_frame_at_time(
    wrapper: *mut XrLeapWrapper,
    timestamp: i64,
) -> *const LEAP_TRACKING_EVENT {
    match unsafe { wrapper.as_mut() } {
        Some(wrapper) => wrapper.inner.get_interpolated_frame_at_time(timestamp).event(),
        None => std::ptr::null(),
    }
}

/// # Safety
///
/// `wrapper` must be null or a live wrapper from `xrleap_create`.
#[no_mangle]
pub unsafe extern "C" fn xrleap_get_device_properties(
    wrapper: *const XrLeapWrapper,
) -> *const LEAP_DEVICE_INFO {
    match unsafe { wrapper.as_ref() } {
        Some(wrapper) => wrapper.inner.get_device_properties(),
        None => std::ptr::null(),
    }
}

/// # Safety
///
/// `wrapper` must be null or a live wrapper from `xrleap_create`.
#[no_mangle]
pub unsafe extern "C" fn xrleap_update_hand_state(wrapper: *mut XrLeapWrapper) {
    if let Some(wrapper) = unsafe { wrapper.as_ref() } {
        wrapper.inner.update_hand_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leapc::{eLeapHandType, LEAP_QUATERNION, LEAP_VECTOR};
    use std::cell::{Cell, RefCell};
    use std::ptr::{null, null_mut};

    #[derive(Default)]
    struct HostState {
        tracker_available: bool,
        seconds: Option<f64>,
        claimed_keypoints: u32,
        loaded: RefCell<Vec<String>>,
        queried: RefCell<Vec<String>>,
        devices_found: Cell<u32>,
    }

    unsafe fn state<'a>(user_data: *mut c_void) -> &'a HostState {
        unsafe { &*(user_data as *const HostState) }
    }

    unsafe extern "C" fn load_module(user_data: *mut c_void, name: *const c_char) {
        let name = unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned();
        unsafe { state(user_data) }.loaded.borrow_mut().push(name);
    }

    unsafe extern "C" fn is_feature_available(
        user_data: *mut c_void,
        name: *const c_char,
    ) -> bool {
        let state = unsafe { state(user_data) };
        let name = unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned();
        state.queried.borrow_mut().push(name);
        state.tracker_available
    }

    /// Tracks only the left hand, and reports `claimed_keypoints` no matter the capacity.
    unsafe extern "C" fn left_hand_only(
        user_data: *mut c_void,
        hand: xr::HandEXT,
        positions: *mut [f32; 3],
        rotations: *mut [f32; 4],
        radii: *mut f32,
        capacity: u32,
        count: *mut u32,
    ) -> bool {
        if hand != xr::HandEXT::LEFT {
            return false;
        }
        for i in 0..capacity as usize {
            unsafe {
                *positions.add(i) = [0.0, i as f32, 0.0];
                *rotations.add(i) = [0.1, 0.2, 0.3, 0.9];
                *radii.add(i) = 1.0;
            }
        }
        unsafe { *count = state(user_data).claimed_keypoints };
        true
    }

    unsafe extern "C" fn time_seconds(user_data: *mut c_void, seconds: *mut f64) -> bool {
        match unsafe { state(user_data) }.seconds {
            Some(s) => {
                unsafe { *seconds = s };
                true
            }
            None => false,
        }
    }

    unsafe extern "C" fn device_found(user_data: *mut c_void, device: *const LEAP_DEVICE_INFO) {
        assert!(!device.is_null());
        let found = &unsafe { state(user_data) }.devices_found;
        found.set(found.get() + 1);
    }

    fn host(state: &HostState) -> XrLeapHost {
        XrLeapHost {
            user_data: state as *const HostState as *mut c_void,
            load_module: Some(load_module),
            is_feature_available: Some(is_feature_available),
            get_all_keypoint_states: Some(left_hand_only),
            time_seconds: Some(time_seconds),
            on_device_found: Some(device_found),
        }
    }

    struct Wrapper(*mut XrLeapWrapper);

    impl Wrapper {
        fn new(host: &XrLeapHost) -> Self {
            let wrapper = unsafe { xrleap_create(host, c"{}".as_ptr()) };
            assert!(!wrapper.is_null());
            Self(wrapper)
        }

        fn frame(&self) -> (LEAP_TRACKING_EVENT, Vec<leapc::LEAP_HAND>) {
            let event = *unsafe { xrleap_get_frame(self.0).as_ref() }.unwrap();
            (event, hands_of(&event))
        }
    }

    impl Drop for Wrapper {
        fn drop(&mut self) {
            unsafe { xrleap_destroy(self.0) };
        }
    }

    fn hands_of(event: &LEAP_TRACKING_EVENT) -> Vec<leapc::LEAP_HAND> {
        if event.nHands == 0 {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(event.pHands, event.nHands as usize) }.to_vec()
    }

    #[test]
    fn unavailable_tracker_stays_unbound() {
        let state = HostState {
            tracker_available: false,
            ..Default::default()
        };
        let wrapper = Wrapper::new(&host(&state));

        assert!(!unsafe { xrleap_open_connection(wrapper.0) });
        assert_eq!(*state.loaded.borrow(), ["OpenXRHandTracking"]);
        assert_eq!(*state.queried.borrow(), ["HandTracker"]);
        assert_eq!(state.devices_found.get(), 0);

        let (event, hands) = wrapper.frame();
        assert_eq!(event.nHands, 0);
        assert_eq!(event.info.frame_id, 0);
        assert!(hands.is_empty());
    }

    #[test]
    fn host_clock_sets_timestamp() {
        let state = HostState {
            tracker_available: true,
            seconds: Some(2.5),
            claimed_keypoints: KEYPOINT_COUNT as u32,
            ..Default::default()
        };
        let wrapper = Wrapper::new(&host(&state));
        assert!(unsafe { xrleap_open_connection(wrapper.0) });
        assert_eq!(state.devices_found.get(), 1);

        let (event, _) = wrapper.frame();
        assert_eq!(event.info.timestamp, 2_500_000);
    }

    #[test]
    fn failing_host_clock_gives_zero_timestamp() {
        let state = HostState {
            tracker_available: true,
            seconds: None,
            claimed_keypoints: KEYPOINT_COUNT as u32,
            ..Default::default()
        };
        let wrapper = Wrapper::new(&host(&state));
        assert!(unsafe { xrleap_open_connection(wrapper.0) });

        let (event, hands) = wrapper.frame();
        assert_eq!(event.info.timestamp, 0);
        assert_eq!(hands.len(), 1);
    }

    #[test]
    fn oversized_keypoint_count_is_clamped() {
        let state = HostState {
            tracker_available: true,
            seconds: Some(1.0),
            claimed_keypoints: 1000,
            ..Default::default()
        };
        let wrapper = Wrapper::new(&host(&state));
        assert!(unsafe { xrleap_open_connection(wrapper.0) });

        let (event, hands) = wrapper.frame();
        assert_eq!(event.nHands, 1);
        let hand = &hands[0];
        assert_eq!(hand.type_, eLeapHandType::Left);
        // little finger tip is the last keypoint, 25 cm to the right
        assert_eq!(
            hand.pinky.distal.next_joint,
            LEAP_VECTOR {
                x: 250.0,
                y: 0.0,
                z: -0.0
            }
        );
        assert_eq!(
            hand.palm.orientation,
            LEAP_QUATERNION {
                x: -0.2,
                y: 0.1,
                z: 0.3,
                w: 0.9
            }
        );
        assert_eq!(hand.thumb.proximal.width, 20.0);
    }

    #[test]
    fn remaining_entry_points() {
        let state = HostState {
            tracker_available: true,
            seconds: Some(3.0),
            claimed_keypoints: KEYPOINT_COUNT as u32,
            ..Default::default()
        };
        let wrapper = Wrapper::new(&host(&state));
        assert!(unsafe { xrleap_open_connection(wrapper.0) });
        // already bound, the device is not reported again
        assert!(unsafe { xrleap_open_connection(wrapper.0) });
        assert_eq!(state.devices_found.get(), 1);

        let device = unsafe { xrleap_get_device_properties(wrapper.0).as_ref() }.unwrap();
        assert_eq!(*device, LEAP_DEVICE_INFO::default());

        unsafe { xrleap_update_hand_state(wrapper.0) };

        let (latest, latest_hands) = wrapper.frame();
        let interpolated =
            *unsafe { xrleap_get_interpolated_frame_at_time(wrapper.0, 12345).as_ref() }.unwrap();
        assert_eq!(interpolated.info.frame_id, latest.info.frame_id + 1);
        assert_eq!(interpolated.info.timestamp, 3_000_000);
        assert_eq!(hands_of(&interpolated), latest_hands);
    }

    #[test]
    fn null_handles() {
        unsafe {
            assert!(!xrleap_open_connection(null_mut()));
            assert!(xrleap_get_frame(null_mut()).is_null());
            assert!(xrleap_get_interpolated_frame_at_time(null_mut(), 0).is_null());
            assert!(xrleap_get_device_properties(null()).is_null());
            xrleap_update_hand_state(null_mut());
            xrleap_destroy(null_mut());
        }
    }
}
