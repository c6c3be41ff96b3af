use crate::types::Coordinate;

/// A named shortcut offered by the search form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopularLocation {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

/// Popular locations in Nepal, in display order.
pub const POPULAR_LOCATIONS: [PopularLocation; 6] = [
    PopularLocation {
        name: "Kathmandu",
        coordinate: Coordinate::new(27.7172, 85.3240),
    },
    PopularLocation {
        name: "Pokhara",
        coordinate: Coordinate::new(28.2096, 83.9856),
    },
    PopularLocation {
        name: "Bhaktapur",
        coordinate: Coordinate::new(27.6710, 85.4298),
    },
    PopularLocation {
        name: "Lalitpur",
        coordinate: Coordinate::new(27.6588, 85.3247),
    },
    PopularLocation {
        name: "Chitwan",
        coordinate: Coordinate::new(27.5291, 84.3542),
    },
    PopularLocation {
        name: "Lumbini",
        coordinate: Coordinate::new(27.4833, 83.2767),
    },
];

/// Case-insensitive lookup by name.
pub fn find_popular(name: &str) -> Option<&'static PopularLocation> {
    let name = name.trim();
    POPULAR_LOCATIONS
        .iter()
        .find(|loc| loc.name.eq_ignore_ascii_case(name))
}
