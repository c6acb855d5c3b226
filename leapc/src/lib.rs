//! LeapC tracking data layout.
//!
//! These mirror the structs from `LeapC.h` that an application reads a tracking frame through, so a
//! `LEAP_TRACKING_EVENT` produced here can be handed straight to code built against LeapC.
#![allow(non_camel_case_types, non_snake_case)]

mod convert;

use std::ffi::{c_char, c_void};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LEAP_VECTOR {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LEAP_QUATERNION {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LEAP_BONE {
    /// Base of the bone, closer to the wrist.
    pub prev_joint: LEAP_VECTOR,
    /// End of the bone, closer to the finger tip.
    pub next_joint: LEAP_VECTOR,
    /// Average width of the flesh around the bone, in millimeters.
    pub width: f32,
    pub rotation: LEAP_QUATERNION,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LEAP_DIGIT {
    pub finger_id: i32,
    pub metacarpal: LEAP_BONE,
    pub proximal: LEAP_BONE,
    pub intermediate: LEAP_BONE,
    pub distal: LEAP_BONE,
    pub is_extended: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LEAP_PALM {
    pub position: LEAP_VECTOR,
    pub stabilized_position: LEAP_VECTOR,
    pub velocity: LEAP_VECTOR,
    pub normal: LEAP_VECTOR,
    pub width: f32,
    pub direction: LEAP_VECTOR,
    pub orientation: LEAP_QUATERNION,
}

#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum eLeapHandType {
    #[default]
    Left = 0,
    Right = 1,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LEAP_HAND {
    pub id: u32,
    pub flags: u32,
    pub type_: eLeapHandType,
    pub confidence: f32,
    /// Microseconds since the hand was first seen.
    pub visible_time: u64,
    pub pinch_distance: f32,
    pub grab_angle: f32,
    pub pinch_strength: f32,
    pub grab_strength: f32,
    pub palm: LEAP_PALM,
    pub thumb: LEAP_DIGIT,
    pub index: LEAP_DIGIT,
    pub middle: LEAP_DIGIT,
    pub ring: LEAP_DIGIT,
    pub pinky: LEAP_DIGIT,
    /// Forearm, ending at the wrist.
    pub arm: LEAP_BONE,
}

impl LEAP_HAND {
    /// An all-zero hand of the given type.
    pub fn new(type_: eLeapHandType) -> Self {
        Self {
            type_,
            ..Default::default()
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LEAP_FRAME_HEADER {
    pub reserved: *mut c_void,
    pub frame_id: i64,
    pub timestamp: i64,
}

impl Default for LEAP_FRAME_HEADER {
    fn default() -> Self {
        Self {
            reserved: std::ptr::null_mut(),
            frame_id: 0,
            timestamp: 0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LEAP_TRACKING_EVENT {
    pub info: LEAP_FRAME_HEADER,
    pub tracking_frame_id: i64,
    pub nHands: u32,
    pub pHands: *mut LEAP_HAND,
    pub framerate: f32,
}

impl Default for LEAP_TRACKING_EVENT {
    fn default() -> Self {
        Self {
            info: Default::default(),
            tracking_frame_id: 0,
            nHands: 0,
            pHands: std::ptr::null_mut(),
            framerate: 0.0,
        }
    }
}

#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum eLeapDevicePID {
    #[default]
    Unknown = 0x0000,
    Peripheral = 0x0003,
    Dragonfly = 0x1102,
    Nightcrawler = 0x1201,
    Rigel = 0x1202,
    SIR170 = 0x1203,
    _3Di = 0x1204,
    LMC2 = 0x1206,
    Invalid = 0xFFFF_FFFF,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LEAP_DEVICE_INFO {
    pub size: u32,
    pub status: u32,
    pub caps: u32,
    pub pid: eLeapDevicePID,
    pub baseline: u32,
    pub serial_length: u32,
    pub serial: *mut c_char,
    pub h_fov: f32,
    pub v_fov: f32,
    pub range: u32,
}

impl Default for LEAP_DEVICE_INFO {
    fn default() -> Self {
        Self {
            size: 0,
            status: 0,
            caps: 0,
            pid: eLeapDevicePID::Unknown,
            baseline: 0,
            serial_length: 0,
            serial: std::ptr::null_mut(),
            h_fov: 0.0,
            v_fov: 0.0,
            range: 0,
        }
    }
}
