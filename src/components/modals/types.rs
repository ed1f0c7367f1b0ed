#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    Confirmed,
    Caption(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ok(Data),
    Cancel,
    Render,
}
