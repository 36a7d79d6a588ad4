use superflow_macros::Series;

#[derive(Debug, Clone, Copy, Series)]
pub struct StagePoint {
    pub flow_rate: f64,
    pub stage: f64,
    pub flow_area: f64,
}

fn main() {
    let p = StagePoint { flow_rate: 750.0, stage: 4.6, flow_area: 59.0 };
    let mut series = StagePointSeries::with_capacity(10);
    series.push(&p);
    assert_eq!(series.len(), 1);
    assert!(!series.is_empty());
    assert_eq!(series.row(0).map(|r| r.stage), Some(4.6));
    assert!(series.row(1).is_none());
    assert_eq!(StagePoint::field_names(), &["flow_rate", "stage", "flow_area"]);
}
