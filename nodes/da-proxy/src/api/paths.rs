pub const PUT_BLOB: &str = "/put";
pub const GET_BLOB: &str = "/get/:certificate";
pub const HEALTH: &str = "/health";
