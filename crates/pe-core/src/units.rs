// pe-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, DynamicViscosity as UomDynamicViscosity,
    Force as UomForce, Length as UomLength, MassDensity as UomMassDensity,
    MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type AngVel = UomAngularVelocity;
pub type DynVisc = UomDynamicViscosity;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn mpa(v: f64) -> Pressure {
    use uom::si::pressure::megapascal;
    Pressure::new::<megapascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn n(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn radps(v: f64) -> AngVel {
    use uom::si::angular_velocity::radian_per_second;
    AngVel::new::<radian_per_second>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pas(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    /// Universal gas constant [J/(kmol·K)]; molar masses are carried in kg/kmol.
    pub const R_UNIVERSAL: f64 = 8_314.459_848;

    /// Sea-level ambient pressure used for sea-level thrust [Pa].
    pub const P_SEA_LEVEL_PA: f64 = 101_300.0;

    /// Pascals per megapascal; tabulated combustion data is in MPa.
    pub const PA_PER_MPA: f64 = 1.0e6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _l = m(2.0);
        let _f = n(1.0e5);
        let _pw = w(3.0e6);
        let _omega = radps(2000.0);
        let _dt = s(0.1);
        let _rho = kgpm3(1141.0);
        let _mu = pas(1.9e-4);
    }

    #[test]
    fn megapascal_converts_to_pascal() {
        assert!((mpa(7.0).value - 7.0e6).abs() < 1e-6);
        assert!((mpa(1.0).value - constants::PA_PER_MPA).abs() < 1e-9);
    }
}
