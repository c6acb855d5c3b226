use crate::convert::{convert_orientation_to_leap, convert_position_to_leap, UE_TO_LEAP_SCALE};
use crate::hand::HandKeypoints;
use leapc::{LEAP_BONE, LEAP_DIGIT, LEAP_HAND};
use openxr_sys as xr;
use paste::paste;
use DigitBone::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    pub fn digit(self, hand: &LEAP_HAND) -> &LEAP_DIGIT {
        match self {
            Finger::Thumb => &hand.thumb,
            Finger::Index => &hand.index,
            Finger::Middle => &hand.middle,
            Finger::Ring => &hand.ring,
            Finger::Little => &hand.pinky,
        }
    }

    pub fn digit_mut(self, hand: &mut LEAP_HAND) -> &mut LEAP_DIGIT {
        match self {
            Finger::Thumb => &mut hand.thumb,
            Finger::Index => &mut hand.index,
            Finger::Middle => &mut hand.middle,
            Finger::Ring => &mut hand.ring,
            Finger::Little => &mut hand.pinky,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DigitBone {
    Metacarpal,
    Proximal,
    Intermediate,
    Distal,
}

impl DigitBone {
    pub fn get(self, digit: &LEAP_DIGIT) -> &LEAP_BONE {
        match self {
            Metacarpal => &digit.metacarpal,
            Proximal => &digit.proximal,
            Intermediate => &digit.intermediate,
            Distal => &digit.distal,
        }
    }

    pub fn get_mut(self, digit: &mut LEAP_DIGIT) -> &mut LEAP_BONE {
        match self {
            Metacarpal => &mut digit.metacarpal,
            Proximal => &mut digit.proximal,
            Intermediate => &mut digit.intermediate,
            Distal => &mut digit.distal,
        }
    }
}

/// What a single keypoint writes into a `LEAP_HAND`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeypointTarget {
    /// Palm position and orientation.
    Palm,
    /// End of the arm and the arm's rotation.
    Wrist,
    /// A finger joint. It is the end of `ends` and the start of `starts`; its rotation belongs to
    /// `starts`.
    Joint {
        finger: Finger,
        ends: Option<DigitBone>,
        starts: Option<DigitBone>,
    },
}

const fn joint(
    finger: Finger,
    ends: Option<DigitBone>,
    starts: Option<DigitBone>,
) -> KeypointTarget {
    KeypointTarget::Joint {
        finger,
        ends,
        starts,
    }
}

macro_rules! targets_for_finger {
    ($xr_finger:ident, $finger:ident) => {
        paste! {&[
            (xr::HandJointEXT::[<$xr_finger _METACARPAL>], joint(Finger::$finger, None, Some(Metacarpal))),
            (xr::HandJointEXT::[<$xr_finger _PROXIMAL>], joint(Finger::$finger, Some(Metacarpal), Some(Proximal))),
            (xr::HandJointEXT::[<$xr_finger _INTERMEDIATE>], joint(Finger::$finger, Some(Proximal), Some(Intermediate))),
            (xr::HandJointEXT::[<$xr_finger _DISTAL>], joint(Finger::$finger, Some(Intermediate), Some(Distal))),
            (xr::HandJointEXT::[<$xr_finger _TIP>], joint(Finger::$finger, Some(Distal), None))
        ]}
    };
}

/// Every XR hand joint with the bone fields it fills, in enumeration order.
///
/// The thumb has no intermediate joint, so its distal joint closes the proximal bone directly and
/// the thumb's intermediate bone is never written.
pub static KEYPOINT_TARGETS: &[&[(xr::HandJointEXT, KeypointTarget)]] = &[
    &[
        (xr::HandJointEXT::PALM, KeypointTarget::Palm),
        (xr::HandJointEXT::WRIST, KeypointTarget::Wrist),
    ],
    &[
        (
            xr::HandJointEXT::THUMB_METACARPAL,
            joint(Finger::Thumb, None, Some(Metacarpal)),
        ),
        (
            xr::HandJointEXT::THUMB_PROXIMAL,
            joint(Finger::Thumb, Some(Metacarpal), Some(Proximal)),
        ),
        (
            xr::HandJointEXT::THUMB_DISTAL,
            joint(Finger::Thumb, Some(Proximal), Some(Distal)),
        ),
        (
            xr::HandJointEXT::THUMB_TIP,
            joint(Finger::Thumb, Some(Distal), None),
        ),
    ],
    targets_for_finger!(INDEX, Index),
    targets_for_finger!(MIDDLE, Middle),
    targets_for_finger!(RING, Ring),
    targets_for_finger!(LITTLE, Little),
];

/// Writes the keypoints of one hand into `hand`, converting them to LeapC space.
///
/// Keypoints missing from `keypoints` leave their fields untouched. Only the fields named by
/// [`KEYPOINT_TARGETS`] (plus bone widths, when radii are present) are written.
pub fn convert_to_leap_space(hand: &mut LEAP_HAND, keypoints: &HandKeypoints) {
    for (joint, target) in KEYPOINT_TARGETS.iter().flat_map(|t| t.iter()).copied() {
        let idx = joint.into_raw() as usize;
        let (Some(position), Some(rotation)) =
            (keypoints.positions.get(idx), keypoints.rotations.get(idx))
        else {
            continue;
        };

        let position = convert_position_to_leap(*position);
        let rotation = convert_orientation_to_leap(*rotation);

        match target {
            KeypointTarget::Palm => {
                // wrist orientation is taken from the palm by consumers
                hand.palm.orientation = rotation;
                hand.palm.position = position;
            }
            KeypointTarget::Wrist => {
                hand.arm.next_joint = position;
                hand.arm.rotation = rotation;
            }
            KeypointTarget::Joint {
                finger,
                ends,
                starts,
            } => {
                let digit = finger.digit_mut(hand);
                if let Some(bone) = ends {
                    bone.get_mut(digit).next_joint = position;
                }
                if let Some(bone) = starts {
                    let bone = bone.get_mut(digit);
                    bone.prev_joint = position;
                    bone.rotation = rotation;
                    if let Some(radius) = keypoints.radii.get(idx) {
                        bone.width = radius * 2.0 * UE_TO_LEAP_SCALE;
                    }
                }
            }
        }
    }
}
