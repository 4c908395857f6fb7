use crate::fetch::detail::PokemonDetail;

/// Output column order. Stat columns keep the upstream stat names,
/// hyphens included.
pub const COLUMNS: [&str; 13] = [
    "id",
    "name",
    "types",
    "abilities",
    "height",
    "weight",
    "base_experience",
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

/// One flat row of the snapshot table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub name: String,
    pub types: String,
    pub abilities: String,
    pub height: i64,
    pub weight: i64,
    pub base_experience: Option<i64>,
    pub hp: Option<i64>,
    pub attack: Option<i64>,
    pub defense: Option<i64>,
    pub special_attack: Option<i64>,
    pub special_defense: Option<i64>,
    pub speed: Option<i64>,
}

impl Row {
    /// Flatten one detail record. Multi-value fields are comma-joined in
    /// wire order; stats the source does not report stay absent.
    pub fn from_detail(detail: &PokemonDetail) -> Self {
        let types = detail
            .types
            .iter()
            .map(|t| t.kind.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let abilities = detail
            .abilities
            .iter()
            .map(|a| a.ability.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let stat = |name: &str| {
            detail
                .stats
                .iter()
                .find(|s| s.stat.name == name)
                .map(|s| s.base_stat)
        };

        Self {
            id: detail.id,
            name: detail.name.clone(),
            types,
            abilities,
            height: detail.height,
            weight: detail.weight,
            base_experience: detail.base_experience,
            hp: stat("hp"),
            attack: stat("attack"),
            defense: stat("defense"),
            special_attack: stat("special-attack"),
            special_defense: stat("special-defense"),
            speed: stat("speed"),
        }
    }

    fn fields(&self) -> [String; 13] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.types.clone(),
            self.abilities.clone(),
            self.height.to_string(),
            self.weight.to_string(),
            opt_field(self.base_experience),
            opt_field(self.hp),
            opt_field(self.attack),
            opt_field(self.defense),
            opt_field(self.special_attack),
            opt_field(self.special_defense),
            opt_field(self.speed),
        ]
    }
}

fn opt_field(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

/// Quote a field only when it needs it: embedded comma, quote, CR or LF.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}

/// Serialize rows to CSV text: header first, then one line per row in
/// input order, `\n` terminated.
pub fn to_csv(rows: &[Row]) -> String {
    // Rough per-row estimate keeps reallocation down for full snapshots.
    let mut out = String::with_capacity(128 + rows.len() * 96);
    out.push_str(&COLUMNS.join(","));
    out.push('\n');

    for row in rows {
        let line = row
            .fields()
            .iter()
            .map(|f| csv_field(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> PokemonDetail {
        serde_json::from_str(
            r#"{
                "id": 1,
                "name": "bulbasaur",
                "height": 7,
                "weight": 69,
                "base_experience": 64,
                "types": [
                    {"type": {"name": "grass", "url": "u"}},
                    {"type": {"name": "poison", "url": "u"}}
                ],
                "abilities": [{"ability": {"name": "overgrow", "url": "u"}}],
                "stats": [{"base_stat": 45, "stat": {"name": "hp", "url": "u"}}]
            }"#,
        )
        .unwrap()
    }

    /// Minimal CSV reader for round-trip checks: handles quoted fields
    /// with doubled quotes, `\n` records.
    fn parse_csv(text: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if quoted {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    '"' => quoted = false,
                    _ => field.push(c),
                }
            } else {
                match c {
                    '"' => quoted = true,
                    ',' => fields.push(std::mem::take(&mut field)),
                    '\n' => {
                        fields.push(std::mem::take(&mut field));
                        records.push(std::mem::take(&mut fields));
                    }
                    _ => field.push(c),
                }
            }
        }
        records
    }

    #[test]
    fn builds_the_bulbasaur_row() {
        let row = Row::from_detail(&bulbasaur());
        assert_eq!(row.id, 1);
        assert_eq!(row.name, "bulbasaur");
        assert_eq!(row.types, "grass,poison");
        assert_eq!(row.abilities, "overgrow");
        assert_eq!(row.height, 7);
        assert_eq!(row.weight, 69);
        assert_eq!(row.base_experience, Some(64));
        assert_eq!(row.hp, Some(45));
        assert_eq!(row.attack, None);
        assert_eq!(row.defense, None);
        assert_eq!(row.special_attack, None);
        assert_eq!(row.special_defense, None);
        assert_eq!(row.speed, None);
    }

    #[test]
    fn row_has_exactly_thirteen_fields() {
        let row = Row::from_detail(&bulbasaur());
        assert_eq!(row.fields().len(), COLUMNS.len());
        assert_eq!(COLUMNS.len(), 13);
    }

    #[test]
    fn joins_carry_no_trailing_delimiter() {
        let row = Row::from_detail(&bulbasaur());
        assert!(!row.types.ends_with(','));
        assert!(!row.abilities.ends_with(','));
    }

    #[test]
    fn unknown_stat_names_stay_absent() {
        let mut detail = bulbasaur();
        detail.stats[0].stat.name = "evasion".to_string();
        let row = Row::from_detail(&detail);
        assert_eq!(row.hp, None);
    }

    #[test]
    fn csv_header_matches_columns() {
        let csv = to_csv(&[]);
        assert_eq!(
            csv,
            "id,name,types,abilities,height,weight,base_experience,\
             hp,attack,defense,special-attack,special-defense,speed\n"
        );
    }

    #[test]
    fn multi_value_fields_are_quoted() {
        let row = Row::from_detail(&bulbasaur());
        let csv = to_csv(&[row]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, "1,bulbasaur,\"grass,poison\",overgrow,7,69,64,45,,,,,");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(csv_field(r#"a"b"#), r#""a""b""#);
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("with,comma"), "\"with,comma\"");
    }

    #[test]
    fn rows_serialize_in_input_order() {
        let mut second = Row::from_detail(&bulbasaur());
        second.id = 2;
        second.name = "ivysaur".to_string();
        let csv = to_csv(&[Row::from_detail(&bulbasaur()), second]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,bulbasaur"));
        assert!(lines[2].starts_with("2,ivysaur"));
    }

    #[test]
    fn csv_round_trips_field_for_field() {
        let mut second = Row::from_detail(&bulbasaur());
        second.id = 2;
        second.name = "ivysaur".to_string();
        second.base_experience = None;
        let rows = vec![Row::from_detail(&bulbasaur()), second];

        let parsed = parse_csv(&to_csv(&rows));
        assert_eq!(parsed[0], COLUMNS.to_vec());
        for (record, row) in parsed[1..].iter().zip(&rows) {
            assert_eq!(record.as_slice(), row.fields().as_slice());
        }
    }
}
