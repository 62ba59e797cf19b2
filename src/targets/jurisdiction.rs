/// A state-level jurisdiction as published on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Jurisdiction {
    /// Two-letter postal code, also the first directory under each mode
    pub code: &'static str,
    pub name: &'static str,
    /// Path component used by the site
    pub slug: &'static str,
}

impl Jurisdiction {
    pub const fn new(code: &'static str, name: &'static str, slug: &'static str) -> Self {
        Self { code, name, slug }
    }
}

/// Canonical jurisdiction list, ordered by full name.
///
/// Range selection walks this order, so "VT".."WY" covers Vermont, Virginia,
/// Washington, West Virginia, Wisconsin and Wyoming.
pub const JURISDICTIONS: &[Jurisdiction] = &[
    Jurisdiction::new("AL", "Alabama", "alabama"),
    Jurisdiction::new("AK", "Alaska", "alaska"),
    Jurisdiction::new("AZ", "Arizona", "arizona"),
    Jurisdiction::new("AR", "Arkansas", "arkansas"),
    Jurisdiction::new("CA", "California", "california"),
    Jurisdiction::new("CO", "Colorado", "colorado"),
    Jurisdiction::new("CT", "Connecticut", "connecticut"),
    Jurisdiction::new("DE", "Delaware", "delaware"),
    Jurisdiction::new("DC", "District of Columbia", "district-of-columbia"),
    Jurisdiction::new("FL", "Florida", "florida"),
    Jurisdiction::new("GA", "Georgia", "georgia"),
    Jurisdiction::new("HI", "Hawaii", "hawaii"),
    Jurisdiction::new("ID", "Idaho", "idaho"),
    Jurisdiction::new("IL", "Illinois", "illinois"),
    Jurisdiction::new("IN", "Indiana", "indiana"),
    Jurisdiction::new("IA", "Iowa", "iowa"),
    Jurisdiction::new("KS", "Kansas", "kansas"),
    Jurisdiction::new("KY", "Kentucky", "kentucky"),
    Jurisdiction::new("LA", "Louisiana", "louisiana"),
    Jurisdiction::new("ME", "Maine", "maine"),
    Jurisdiction::new("MD", "Maryland", "maryland"),
    Jurisdiction::new("MA", "Massachusetts", "massachusetts"),
    Jurisdiction::new("MI", "Michigan", "michigan"),
    Jurisdiction::new("MN", "Minnesota", "minnesota"),
    Jurisdiction::new("MS", "Mississippi", "mississippi"),
    Jurisdiction::new("MO", "Missouri", "missouri"),
    Jurisdiction::new("MT", "Montana", "montana"),
    Jurisdiction::new("NE", "Nebraska", "nebraska"),
    Jurisdiction::new("NV", "Nevada", "nevada"),
    Jurisdiction::new("NH", "New Hampshire", "new-hampshire"),
    Jurisdiction::new("NJ", "New Jersey", "new-jersey"),
    Jurisdiction::new("NM", "New Mexico", "new-mexico"),
    Jurisdiction::new("NY", "New York", "new-york"),
    Jurisdiction::new("NC", "North Carolina", "north-carolina"),
    Jurisdiction::new("ND", "North Dakota", "north-dakota"),
    Jurisdiction::new("OH", "Ohio", "ohio"),
    Jurisdiction::new("OK", "Oklahoma", "oklahoma"),
    Jurisdiction::new("OR", "Oregon", "oregon"),
    Jurisdiction::new("PA", "Pennsylvania", "pennsylvania"),
    Jurisdiction::new("RI", "Rhode Island", "rhode-island"),
    Jurisdiction::new("SC", "South Carolina", "south-carolina"),
    Jurisdiction::new("SD", "South Dakota", "south-dakota"),
    Jurisdiction::new("TN", "Tennessee", "tennessee"),
    Jurisdiction::new("TX", "Texas", "texas"),
    Jurisdiction::new("UT", "Utah", "utah"),
    Jurisdiction::new("VT", "Vermont", "vermont"),
    Jurisdiction::new("VA", "Virginia", "virginia"),
    Jurisdiction::new("WA", "Washington", "washington"),
    Jurisdiction::new("WV", "West Virginia", "west-virginia"),
    Jurisdiction::new("WI", "Wisconsin", "wisconsin"),
    Jurisdiction::new("WY", "Wyoming", "wyoming"),
];

/// Looks up a jurisdiction by code (case-insensitive)
pub fn find<'a>(list: &'a [Jurisdiction], code: &str) -> Option<(usize, &'a Jurisdiction)> {
    list.iter()
        .enumerate()
        .find(|(_, j)| j.code.eq_ignore_ascii_case(code.trim()))
}
