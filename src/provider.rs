//! Seams to the host engine.

use crate::hand::{Hand, HandKeypoints};
use leapc::LEAP_DEVICE_INFO;

/// The host's modular feature registry.
pub trait FeatureRegistry {
    type Tracker: HandTracker;

    /// Asks the host to load a module. Loading a module may make new features available.
    fn load_module(&self, name: &str);

    /// Looks up the hand tracking feature registered under `feature_name`.
    fn find_hand_tracker(&self, feature_name: &str) -> Option<Self::Tracker>;
}

pub trait HandTracker {
    /// Fills `keypoints` with the current keypoints of `hand`, indexed by `xr::HandJointEXT`.
    ///
    /// Returns whether the hand is currently tracked. `keypoints` is only read when this returns
    /// true.
    fn get_all_keypoint_states(&self, hand: Hand, keypoints: &mut HandKeypoints) -> bool;
}

/// Simulation clock of the host.
pub trait WorldClock {
    fn time_seconds(&self) -> f64;
}

/// Receives device notifications from the wrapper.
pub trait LeapWrapperCallback {
    fn on_device_found(&self, device: &LEAP_DEVICE_INFO);
}
