use super::descriptor::{Vehicle, VehicleBuilder};

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

/// Blunt ballistic capsule (no lift), entering at 7 km/s from 100 km.
pub fn ballistic_capsule() -> Vehicle {
    VehicleBuilder::new()
        .mass(2_500.0)
        .reference_area(3.8)
        .drag_coefficient(1.2)
        .lift_coefficient(0.0)
        .initial_angle(-5.0)
        .initial_altitude(100_000.0)
        .initial_velocity(7_000.0)
        .nose_radius(1.0)
        .emission_coefficient(0.8)
        .build()
}

/// Slender lifting body with L/D = 0.9 on a shallow entry.
pub fn lifting_body() -> Vehicle {
    VehicleBuilder::new()
        .mass(8_000.0)
        .reference_area(20.0)
        .drag_coefficient(0.8)
        .lift_coefficient(0.72)
        .initial_angle(-2.0)
        .initial_altitude(120_000.0)
        .initial_velocity(7_500.0)
        .nose_radius(0.5)
        .emission_coefficient(0.85)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(ballistic_capsule().validate().is_ok());
        assert!(lifting_body().validate().is_ok());
    }

    #[test]
    fn capsule_is_ballistic_and_body_lifts() {
        assert_eq!(ballistic_capsule().l_over_d, 0.0);
        assert!((lifting_body().l_over_d - 0.9).abs() < 1e-12);
        assert!((lifting_body().ballistic_coefficient - 500.0).abs() < 1e-9);
    }
}
