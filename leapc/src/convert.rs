use super::*;
use glam::{Quat, Vec3};

impl From<Vec3> for LEAP_VECTOR {
    fn from(value: Vec3) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
        }
    }
}

impl From<LEAP_VECTOR> for Vec3 {
    fn from(value: LEAP_VECTOR) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

impl From<Quat> for LEAP_QUATERNION {
    fn from(value: Quat) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
            w: value.w,
        }
    }
}

impl From<LEAP_QUATERNION> for Quat {
    fn from(value: LEAP_QUATERNION) -> Self {
        Quat::from_xyzw(value.x, value.y, value.z, value.w)
    }
}
