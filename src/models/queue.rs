use sea_orm::entity::prelude::*;

/// Declared durable queues
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "queues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub durable: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::queue_message::Entity")]
    QueueMessage,
}

impl Related<super::queue_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QueueMessage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
