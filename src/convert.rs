use glam::{Quat, Vec3};
use leapc::{LEAP_QUATERNION, LEAP_VECTOR};

/// Engine units are centimeters, LeapC wants millimeters.
pub const UE_TO_LEAP_SCALE: f32 = 10.0;

/// Engine space (X forward, Y right, Z up) to LeapC space (x right, y up, z towards the user).
pub fn convert_position_to_leap(position: Vec3) -> LEAP_VECTOR {
    (Vec3::new(position.y, position.z, -position.x) * UE_TO_LEAP_SCALE).into()
}

/// Swaps the quaternion into LeapC's axis convention. This is not the rotation matching
/// [`convert_position_to_leap`], consumers of the frames expect exactly this remap.
pub fn convert_orientation_to_leap(rotation: Quat) -> LEAP_QUATERNION {
    LEAP_QUATERNION {
        x: -rotation.y,
        y: rotation.x,
        z: rotation.z,
        w: rotation.w,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec(v: LEAP_VECTOR) -> Vec3 {
        v.into()
    }

    #[test]
    fn orientation_identity() {
        assert_eq!(
            convert_orientation_to_leap(Quat::IDENTITY),
            LEAP_QUATERNION {
                x: 0.0,
                y: 0.0,
                z: 0.0,
                w: 1.0
            }
        );
    }

    #[test]
    fn orientation_swaps_x_and_y() {
        assert_eq!(
            convert_orientation_to_leap(Quat::from_xyzw(1.0, 0.0, 0.0, 0.0)),
            LEAP_QUATERNION {
                x: 0.0,
                y: 1.0,
                z: 0.0,
                w: 0.0
            }
        );

        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9);
        let converted = convert_orientation_to_leap(q);
        assert_eq!(converted.x, -0.2);
        assert_eq!(converted.y, 0.1);
        assert_eq!(converted.z, 0.3);
        assert_eq!(converted.w, 0.9);
    }

    #[test]
    fn position_origin_stays_put() {
        assert_eq!(vec(convert_position_to_leap(Vec3::ZERO)), Vec3::ZERO);
    }

    #[test]
    fn position_is_linear() {
        let v = Vec3::new(1.5, -2.0, 3.25);
        let single = vec(convert_position_to_leap(v));
        let double = vec(convert_position_to_leap(v * 2.0));
        assert!(double.abs_diff_eq(single * 2.0, 1e-5), "{double} != 2 * {single}");

        let w = Vec3::new(-4.0, 0.5, 7.0);
        let sum = vec(convert_position_to_leap(v + w));
        let parts = single + vec(convert_position_to_leap(w));
        assert!(sum.abs_diff_eq(parts, 1e-5), "{sum} != {parts}");
    }

    #[test]
    fn position_axes() {
        // one centimeter forward, right and up
        assert_eq!(
            vec(convert_position_to_leap(Vec3::X)),
            Vec3::new(0.0, 0.0, -10.0)
        );
        assert_eq!(
            vec(convert_position_to_leap(Vec3::Y)),
            Vec3::new(10.0, 0.0, 0.0)
        );
        assert_eq!(
            vec(convert_position_to_leap(Vec3::Z)),
            Vec3::new(0.0, 10.0, 0.0)
        );
    }
}
