use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Gym {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub invite_code: String,
}

impl Gym {
    pub fn is_owner(&self, member_id: i64) -> bool {
        self.owner_id == member_id
    }
}
