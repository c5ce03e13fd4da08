use sea_orm::entity::prelude::*;

pub const STATUS_READY: &str = "ready";
pub const STATUS_UNACKED: &str = "unacked";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "queue_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub queue: String,
    pub payload: Vec<u8>,
    pub status: String, // 'ready', 'unacked'
    pub attempts: i32,
    /// Fixed-width RFC 3339 with nanoseconds, so it sorts lexicographically
    pub enqueued_at: String,
    pub claimed_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::queue::Entity",
        from = "Column::Queue",
        to = "super::queue::Column::Name",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Queue,
}

impl Related<super::queue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Queue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
