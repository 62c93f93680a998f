//! Fixed DroneDeploy annotation palette.
//!
//! The mapping platform renders annotations best with one of ten named
//! colors. Each entry pairs a stroke color with a lighter fill color.
//! Entry 0 is the default used for KML imports and for unparseable input.

use serde::Serialize;

/// One named palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneDeployColor {
    pub name: &'static str,
    pub color: &'static str,
    pub fill_color: &'static str,
}

/// The ten palette entries, in match priority order.
pub static PALETTE: [DroneDeployColor; 10] = [
    DroneDeployColor {
        name: "Blue",
        color: "#1e88e5",
        fill_color: "#90caf9",
    },
    DroneDeployColor {
        name: "Red",
        color: "#e53935",
        fill_color: "#ef9a9a",
    },
    DroneDeployColor {
        name: "Green",
        color: "#43a047",
        fill_color: "#a5d6a7",
    },
    DroneDeployColor {
        name: "Yellow",
        color: "#fdd835",
        fill_color: "#fff59d",
    },
    DroneDeployColor {
        name: "Orange",
        color: "#fb8c00",
        fill_color: "#ffcc80",
    },
    DroneDeployColor {
        name: "Purple",
        color: "#8e24aa",
        fill_color: "#ce93d8",
    },
    DroneDeployColor {
        name: "Teal",
        color: "#00897b",
        fill_color: "#80cbc4",
    },
    DroneDeployColor {
        name: "Pink",
        color: "#d81b60",
        fill_color: "#f48fb1",
    },
    DroneDeployColor {
        name: "Black",
        color: "#212121",
        fill_color: "#757575",
    },
    DroneDeployColor {
        name: "White",
        color: "#ffffff",
        fill_color: "#eeeeee",
    },
];

/// The default palette entry.
pub fn default_color() -> &'static DroneDeployColor {
    &PALETTE[0]
}

/// Look up a palette entry by name, ignoring case.
pub fn find_by_name(name: &str) -> Option<&'static DroneDeployColor> {
    PALETTE
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
}
