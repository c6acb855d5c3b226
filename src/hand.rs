use glam::{Quat, Vec3};
use leapc::eLeapHandType;
use openxr_sys as xr;

/// Number of keypoints in the XR hand joint enumeration.
pub const KEYPOINT_COUNT: usize = 26;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    /// Slot of this hand in the wrapper's hand storage.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

impl From<Hand> for eLeapHandType {
    fn from(value: Hand) -> Self {
        match value {
            Hand::Left => eLeapHandType::Left,
            Hand::Right => eLeapHandType::Right,
        }
    }
}

impl From<Hand> for xr::HandEXT {
    fn from(value: Hand) -> Self {
        match value {
            Hand::Left => xr::HandEXT::LEFT,
            Hand::Right => xr::HandEXT::RIGHT,
        }
    }
}

/// Keypoint data for one hand, indexed by `xr::HandJointEXT` and given in the host engine's space.
///
/// The buffers are cleared and refilled by [`HandTracker`](crate::HandTracker) implementations each
/// frame; the wrapper keeps one of these per hand so their capacity is reused.
#[derive(Clone, Debug, Default)]
pub struct HandKeypoints {
    pub positions: Vec<Vec3>,
    pub rotations: Vec<Quat>,
    pub radii: Vec<f32>,
}

impl HandKeypoints {
    pub fn new() -> Self {
        Self {
            positions: Vec::with_capacity(KEYPOINT_COUNT),
            rotations: Vec::with_capacity(KEYPOINT_COUNT),
            radii: Vec::with_capacity(KEYPOINT_COUNT),
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.rotations.clear();
        self.radii.clear();
    }

    pub fn push(&mut self, position: Vec3, rotation: Quat, radius: f32) {
        self.positions.push(position);
        self.rotations.push(rotation);
        self.radii.push(radius);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
