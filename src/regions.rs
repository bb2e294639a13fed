//! Fixed reference data for the North East development register.

pub const PILLARS: [&str; 11] = [
    "Peaceful Society",
    "Leadership in Agriculture",
    "Healthy Citizens",
    "Educated Populace",
    "Flourishing Trade",
    "Productive Entrepreneurs",
    "Purposeful Infrastructure",
    "Industrialization",
    "Memorable Experience",
    "Protected Environment",
    "Connected Region",
];

pub const STATES: [&str; 6] = ["Adamawa", "Bauchi", "Borno", "Gombe", "Taraba", "Yobe"];

pub const STATUS_OPTIONS: [&str; 5] = [
    "Completed (Handed over)",
    "Completed (Not handed over)",
    "Ongoing",
    "Abandoned",
    "Yet to commence",
];

/// Local government areas per state, in display order.
pub const LGA_BY_STATE: [(&str, &[&str]); 6] = [
    (
        "Adamawa",
        &[
            "Demsa", "Fufore", "Ganye", "Girei", "Gombi", "Guyuk", "Hong", "Jada", "Lamurde",
            "Madagali", "Maiha", "Mayo-Belwa", "Michika", "Mubi North", "Mubi South", "Numan",
            "Shelleng", "Song", "Toungo", "Yola North", "Yola South",
        ],
    ),
    (
        "Bauchi",
        &[
            "Alkaleri", "Bauchi", "Bogoro", "Damban", "Darazo", "Dass", "Gamawa", "Ganjuwa",
            "Giade", "Itas/Gadau", "Jama'are", "Katagum", "Kirfi", "Misau", "Ningi", "Shira",
            "Tafawa-Balewa", "Toro", "Warji", "Zaki",
        ],
    ),
    (
        "Borno",
        &[
            "Abadam", "Askira/Uba", "Bama", "Bayo", "Biu", "Chibok", "Damboa", "Dikwa", "Gubio",
            "Guzamala", "Gwoza", "Hawul", "Jere", "Kaga", "Kala/Balge", "Konduga", "Kukawa",
            "Kwaya Kusar", "Mafa", "Magumeri", "Maiduguri", "Marte", "Mobbar", "Monguno", "Ngala",
            "Nganzai", "Shani",
        ],
    ),
    (
        "Gombe",
        &[
            "Akko", "Balanga", "Billiri", "Dukku", "Funakaye", "Gombe", "Kaltungo", "Kwami",
            "Nafada", "Shongom", "Yamaltu/Deba",
        ],
    ),
    (
        "Taraba",
        &[
            "Ardo-Kola", "Bali", "Donga", "Gashaka", "Gassol", "Ibi", "Jalingo", "Karim-Lamido",
            "Kurmi", "Lau", "Sardauna", "Takum", "Ussa", "Wukari", "Yorro", "Zing",
        ],
    ),
    (
        "Yobe",
        &[
            "Bade", "Bursari", "Damaturu", "Fika", "Fune", "Geidam", "Gujba", "Gulani", "Jakusko",
            "Karasuwa", "Machina", "Nangere", "Nguru", "Potiskum", "Tarmuwa", "Yunusari",
            "Yusufari",
        ],
    ),
];

/// Areas of a single state; unknown states have none.
pub fn lgas_for_state(state: &str) -> &'static [&'static str] {
    LGA_BY_STATE
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, lgas)| *lgas)
        .unwrap_or(&[])
}

/// Union of areas reachable from the given states, deduplicated, in mapping order.
pub fn lgas_for_states<'a, I>(states: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lgas: Vec<&'static str> = Vec::new();
    for state in states {
        for lga in lgas_for_state(state) {
            if !lgas.contains(lga) {
                lgas.push(lga);
            }
        }
    }
    lgas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_areas() {
        for state in STATES {
            assert!(!lgas_for_state(state).is_empty(), "{state} has no areas");
        }
        assert!(lgas_for_state("Lagos").is_empty());
    }

    #[test]
    fn union_keeps_mapping_order_without_duplicates() {
        let lgas = lgas_for_states(["Gombe", "Gombe", "Yobe"]);
        assert_eq!(lgas.first(), Some(&"Akko"));
        assert_eq!(lgas.len(), 11 + 17);
    }
}
