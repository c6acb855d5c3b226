//! A stand-in for an engine's hand tracking runtime: a feature registry with loadable modules, a
//! per-hand joint source and a world clock, all driven from tests.
use crossbeam_utils::atomic::AtomicCell;
use glam::{Quat, Vec3};
use openxr_sys as xr;
use paste::paste;
use std::collections::{HashMap, HashSet};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

pub const JOINT_COUNT: usize = 26;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JointSample {
    /// Centimeters, X forward, Y right, Z up.
    pub position: Vec3,
    pub orientation: Quat,
    pub radius: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UserHand {
    Left,
    Right,
}

impl UserHand {
    pub fn to_xr(self) -> xr::HandEXT {
        match self {
            Self::Left => xr::HandEXT::LEFT,
            Self::Right => xr::HandEXT::RIGHT,
        }
    }

    pub fn from_xr(hand: xr::HandEXT) -> Option<Self> {
        match hand {
            xr::HandEXT::LEFT => Some(Self::Left),
            xr::HandEXT::RIGHT => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Default)]
struct HandData {
    tracked: AtomicBool,
    joints: Mutex<Vec<JointSample>>,
}

#[derive(Default)]
pub struct FakeRuntime {
    features: Mutex<HashSet<String>>,
    /// module name -> feature it registers once loaded
    module_features: Mutex<HashMap<String, String>>,
    loaded_modules: Mutex<Vec<String>>,
    left_hand: HandData,
    right_hand: HandData,
    time: AtomicCell<Option<f64>>,
    queries: AtomicU64,
}

impl FakeRuntime {
    pub fn new() -> Arc<Self> {
        Arc::default()
    }

    fn hand_data(&self, hand: UserHand) -> &HandData {
        match hand {
            UserHand::Left => &self.left_hand,
            UserHand::Right => &self.right_hand,
        }
    }

    /// Makes a feature available right away.
    pub fn register_feature(&self, name: &str) {
        self.features.lock().unwrap().insert(name.to_owned());
    }

    /// Makes `feature` available once `module` gets loaded.
    pub fn register_module(&self, module: &str, feature: &str) {
        self.module_features
            .lock()
            .unwrap()
            .insert(module.to_owned(), feature.to_owned());
    }

    pub fn load_module(&self, module: &str) {
        self.loaded_modules.lock().unwrap().push(module.to_owned());
        if let Some(feature) = self.module_features.lock().unwrap().get(module) {
            self.register_feature(feature);
        }
    }

    pub fn loaded_modules(&self) -> Vec<String> {
        self.loaded_modules.lock().unwrap().clone()
    }

    pub fn is_feature_available(&self, name: &str) -> bool {
        self.features.lock().unwrap().contains(name)
    }

    pub fn set_tracked(&self, hand: UserHand, tracked: bool) {
        self.hand_data(hand).tracked.store(tracked, Ordering::Relaxed);
    }

    pub fn set_joints(&self, hand: UserHand, joints: &[JointSample]) {
        let mut data = self.hand_data(hand).joints.lock().unwrap();
        data.clear();
        data.extend_from_slice(joints);
    }

    /// Hands the current joints of `hand` to `f` if the hand is tracked.
    /// Returns whether the hand is tracked.
    pub fn locate_hand_joints(&self, hand: UserHand, f: impl FnOnce(&[JointSample])) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let data = self.hand_data(hand);
        if !data.tracked.load(Ordering::Relaxed) {
            return false;
        }
        f(&data.joints.lock().unwrap());
        true
    }

    /// Number of joint queries made so far, across both hands.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn set_time(&self, seconds: Option<f64>) {
        self.time.store(seconds);
    }

    pub fn time(&self) -> Option<f64> {
        self.time.load()
    }
}

macro_rules! finger_joints {
    ($finger:ident) => {
        paste! {[
            xr::HandJointEXT::[<$finger _METACARPAL>],
            xr::HandJointEXT::[<$finger _PROXIMAL>],
            xr::HandJointEXT::[<$finger _INTERMEDIATE>],
            xr::HandJointEXT::[<$finger _DISTAL>],
            xr::HandJointEXT::[<$finger _TIP>],
        ].as_slice()}
    };
}

/// Joints per finger from the wrist out, paired with the finger's sideways offset on a right hand.
static FINGERS: [(&[xr::HandJointEXT], f32); 5] = [
    (
        &[
            xr::HandJointEXT::THUMB_METACARPAL,
            xr::HandJointEXT::THUMB_PROXIMAL,
            xr::HandJointEXT::THUMB_DISTAL,
            xr::HandJointEXT::THUMB_TIP,
        ],
        -4.0,
    ),
    (finger_joints!(INDEX), -2.0),
    (finger_joints!(MIDDLE), 0.0),
    (finger_joints!(RING), 2.0),
    (finger_joints!(LITTLE), 4.0),
];

/// A flat, open hand with its palm at `origin`. Every joint gets a distinct position and
/// orientation so mixups between joints are visible.
pub fn synthetic_hand(hand: UserHand, origin: Vec3) -> [JointSample; JOINT_COUNT] {
    let side = match hand {
        UserHand::Left => -1.0,
        UserHand::Right => 1.0,
    };

    let mut joints = [JointSample::default(); JOINT_COUNT];
    let mut set = |joint: xr::HandJointEXT, offset: Vec3, radius: f32| {
        let idx = joint.into_raw() as usize;
        joints[idx] = JointSample {
            position: origin + offset,
            orientation: Quat::from_rotation_z(side * 0.05 * idx as f32),
            radius,
        };
    };

    set(xr::HandJointEXT::PALM, Vec3::ZERO, 2.0);
    set(xr::HandJointEXT::WRIST, Vec3::new(-5.0, 0.0, 0.0), 2.5);
    for (finger, spread) in FINGERS {
        for (i, joint) in finger.iter().copied().enumerate() {
            let along = -3.0 + 2.5 * i as f32;
            set(
                joint,
                Vec3::new(along, side * spread, 0.1 * i as f32),
                1.0 - 0.15 * i as f32,
            );
        }
    }

    joints
}
