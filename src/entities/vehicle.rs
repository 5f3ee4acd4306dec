use serde::{Deserialize, Serialize};

/// Pricing parameters for one vehicle class, in whole currency units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FareTable {
    pub base: f64,
    pub per_km: f64,
    pub minimum: f64,
}

impl FareTable {
    pub const DEFAULT: FareTable = FareTable {
        base: 15000.0,
        per_km: 12000.0,
        minimum: 30000.0,
    };
}

/// Vehicle classes offered for booking. Any other name is carried through
/// as `Other` and priced with the default table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleClass {
    Bike,
    BikePremium,
    Car4,
    Car7,
    CarLuxury,
    Other(String),
}

impl From<String> for VehicleClass {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bike" => Self::Bike,
            "bike_premium" => Self::BikePremium,
            "car4" => Self::Car4,
            "car7" => Self::Car7,
            "car_luxury" => Self::CarLuxury,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for VehicleClass {
    fn from(name: &str) -> Self {
        name.to_string().into()
    }
}

impl From<VehicleClass> for String {
    fn from(vehicle: VehicleClass) -> Self {
        vehicle.name().into()
    }
}

impl VehicleClass {
    pub fn name(&self) -> &str {
        match self {
            Self::Bike => "bike",
            Self::BikePremium => "bike_premium",
            Self::Car4 => "car4",
            Self::Car7 => "car7",
            Self::CarLuxury => "car_luxury",
            Self::Other(name) => name.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bike => "Motorbike",
            Self::BikePremium => "Premium motorbike",
            Self::Car4 => "4-seat car",
            Self::Car7 => "7-seat car",
            Self::CarLuxury => "Luxury car",
            Self::Other(_) => "Standard",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn fare_table(&self) -> FareTable {
        match self {
            Self::Bike => FareTable {
                base: 10000.0,
                per_km: 8000.0,
                minimum: 15000.0,
            },
            Self::BikePremium => FareTable {
                base: 15000.0,
                per_km: 10000.0,
                minimum: 20000.0,
            },
            Self::Car4 => FareTable {
                base: 20000.0,
                per_km: 12000.0,
                minimum: 30000.0,
            },
            Self::Car7 => FareTable {
                base: 25000.0,
                per_km: 15000.0,
                minimum: 40000.0,
            },
            Self::CarLuxury => FareTable {
                base: 50000.0,
                per_km: 25000.0,
                minimum: 100000.0,
            },
            Self::Other(_) => FareTable::DEFAULT,
        }
    }
}

#[test]
fn vehicle_names_round_trip_through_serde() {
    let vehicle: VehicleClass = serde_json::from_str("\"bike_premium\"").unwrap();
    assert_eq!(vehicle, VehicleClass::BikePremium);
    assert_eq!(serde_json::to_string(&vehicle).unwrap(), "\"bike_premium\"");

    let vehicle: VehicleClass = serde_json::from_str("\"tuk_tuk\"").unwrap();
    assert_eq!(vehicle, VehicleClass::Other("tuk_tuk".into()));
    assert_eq!(serde_json::to_string(&vehicle).unwrap(), "\"tuk_tuk\"");
}

#[test]
fn unrecognized_vehicle_uses_default_table() {
    let vehicle = VehicleClass::from("unknown");

    assert!(!vehicle.is_recognized());
    assert_eq!(vehicle.fare_table(), FareTable::DEFAULT);
}

#[test]
fn base_is_below_minimum_in_every_table() {
    for name in ["bike", "bike_premium", "car4", "car7", "car_luxury", "other"] {
        let table = VehicleClass::from(name).fare_table();
        assert!(table.base < table.minimum, "{}", name);
    }
}
