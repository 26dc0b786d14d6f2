use std::{
    cmp::Ordering,
    fmt,
    marker::PhantomData,
    ops::Add,
};

pub trait DistanceUnit: Copy + Eq {
    const NAME: &'static str;
    const NANOMETERS_IN_UNIT: i64;
}

/// A length stored as an integer number of nanometres, tagged with the unit it is read in.
///
/// Keeping the raw value integral makes sums of edge distances exact and order independent,
/// which keeps matrices bit-identical across runs and thread counts.
#[derive(Debug, Clone, Copy, Eq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct Distance<T: DistanceUnit> {
    nm: i64,
    unit: PhantomData<T>,
}

macro_rules! create_distance_unit {
    ($struct_name:ident, $string_name:expr , $nm_conv:expr) => {
        #[derive(Debug, Copy, Clone, Eq, PartialEq)]
        pub struct $struct_name; // unit-like struct

        impl DistanceUnit for $struct_name {
            const NAME: &'static str = $string_name;
            const NANOMETERS_IN_UNIT: i64 = $nm_conv;
        }
    };
}

create_distance_unit!(Meters, "meter", 1_000_000_000);
create_distance_unit!(Kilometers, "kilometer", 1_000_000_000_000);
create_distance_unit!(Miles, "mile", 1_609_344_000_000);

impl<T: DistanceUnit> Distance<T> {
    pub fn from_nanometers(nm: i64) -> Self {
        Distance {
            nm,
            unit: PhantomData,
        }
    }

    pub fn nanometers(&self) -> i64 {
        self.nm
    }

    #[inline(always)]
    pub fn value(&self) -> f64 {
        (self.nm as f64) / (T::NANOMETERS_IN_UNIT as f64)
    }

    /// Reads the same length in another unit
    pub fn convert<U: DistanceUnit>(self) -> Distance<U> {
        Distance {
            nm: self.nm,
            unit: PhantomData,
        }
    }
}

impl<T: DistanceUnit> Default for Distance<T> {
    fn default() -> Self {
        Distance::from_nanometers(0)
    }
}

impl<T> fmt::Display for Distance<T>
where
    T: DistanceUnit,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = self.value();

        write!(
            f,
            "{} {}{}",
            value,
            T::NAME,
            match value {
                1_f64 => "",
                _ => "s",
            }
        )
    }
}

impl<T> Ord for Distance<T>
where
    T: DistanceUnit,
{
    fn cmp(&self, other: &Distance<T>) -> Ordering {
        self.nm.cmp(&other.nm)
    }
}

impl<T1, T2> PartialEq<Distance<T2>> for Distance<T1>
where
    T1: DistanceUnit,
    T2: DistanceUnit,
{
    fn eq(&self, other: &Distance<T2>) -> bool {
        self.nm == other.nm
    }
}

// implement PartialOrd for ordering lengths with different units
impl<T1, T2> PartialOrd<Distance<T2>> for Distance<T1>
where
    T1: DistanceUnit,
    T2: DistanceUnit,
{
    fn partial_cmp(&self, other: &Distance<T2>) -> Option<Ordering> {
        Some(self.nm.cmp(&other.nm))
    }
}

impl<T> From<i64> for Distance<T>
where
    T: DistanceUnit,
{
    fn from(value: i64) -> Self {
        Distance::from_nanometers(value * T::NANOMETERS_IN_UNIT)
    }
}

impl<T1, T2> Add<Distance<T2>> for Distance<T1>
where
    T1: DistanceUnit,
    T2: DistanceUnit,
{
    type Output = Distance<T1>;

    fn add(self, other: Distance<T2>) -> Distance<T1> {
        Distance::from_nanometers(self.nm + other.nm)
    }
}

#[macro_export]
macro_rules! meters {
    ($num:expr) => {
        $crate::distance::Distance::<$crate::distance::Meters>::from($num)
    };
}

#[macro_export]
macro_rules! kilometers {
    ($num:expr) => {
        $crate::distance::Distance::<$crate::distance::Kilometers>::from($num)
    };
}
