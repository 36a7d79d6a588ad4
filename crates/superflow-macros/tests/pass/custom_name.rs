use superflow_macros::Series;

#[derive(Debug, Clone, Copy, Series)]
#[series(name = "LevelTable")]
pub struct LevelRow {
    pub summer_bed: f64,
    pub summer_plains: f64,
}

fn main() {
    let row = LevelRow { summer_bed: 3.5, summer_plains: 1.2 };
    let mut table = LevelTable::with_capacity(5);
    table.push(&row);
    table.push(&row);
    assert_eq!(table.len(), 2);
    assert_eq!(LevelRow::field_names(), &["summer_bed", "summer_plains"]);
}
