use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workflows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// JSON array of strings
    #[sea_orm(column_type = "Text")]
    pub tags: String,

    /// JSON array of strings
    #[sea_orm(column_type = "Text")]
    pub use_cases: String,

    /// JSON array of strings
    #[sea_orm(column_type = "Text")]
    pub process_steps: String,

    /// JSON array of strings
    #[sea_orm(column_type = "Text")]
    pub technical_features: String,

    /// JSON array of strings
    #[sea_orm(column_type = "Text")]
    pub service_names: String,

    pub node_count: i32,

    pub trigger_name: String,

    /// The uploaded document exactly as received.
    #[sea_orm(column_type = "Text")]
    pub raw_json: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
