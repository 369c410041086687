#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionPicked(pub usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrailShown(pub Vec<&'static str>);
