use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use crate::domain::{UserId, WorkflowId};
use crate::entities::workflows;
use crate::models::workflow::{NewWorkflow, Workflow, WorkflowUpdate, normalize_tags};

pub struct WorkflowRepository {
    conn: DatabaseConnection,
}

impl WorkflowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, workflow: &NewWorkflow) -> Result<Workflow> {
        let now = chrono::Utc::now().to_rfc3339();
        let node_count =
            i32::try_from(workflow.node_count).context("Node count does not fit in i32")?;

        let active = workflows::ActiveModel {
            user_id: Set(workflow.user_id.value()),
            title: Set(workflow.title.clone()),
            description: Set(workflow.description.clone()),
            tags: Set(encode_list(&workflow.tags)?),
            use_cases: Set(encode_list(&workflow.use_cases)?),
            process_steps: Set(encode_list(&workflow.process_steps)?),
            technical_features: Set(encode_list(&workflow.technical_features)?),
            service_names: Set(encode_list(&workflow.service_names)?),
            node_count: Set(node_count),
            trigger_name: Set(workflow.trigger.clone()),
            raw_json: Set(workflow.raw_json.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert workflow")?;

        Ok(Self::map_model(model))
    }

    /// All workflows of one owner, newest first.
    pub async fn list_for_user(&self, owner: UserId) -> Result<Vec<Workflow>> {
        let rows = workflows::Entity::find()
            .filter(workflows::Column::UserId.eq(owner.value()))
            .order_by_desc(workflows::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list workflows")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: WorkflowId, owner: UserId) -> Result<Option<Workflow>> {
        let row = workflows::Entity::find()
            .filter(workflows::Column::Id.eq(id.value()))
            .filter(workflows::Column::UserId.eq(owner.value()))
            .one(&self.conn)
            .await
            .context("Failed to query workflow")?;

        Ok(row.map(Self::map_model))
    }

    /// Returns false when no row matched `(id, owner)`.
    pub async fn update(
        &self,
        id: WorkflowId,
        owner: UserId,
        update: &WorkflowUpdate,
    ) -> Result<bool> {
        let mut query = workflows::Entity::update_many()
            .col_expr(
                workflows::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(workflows::Column::Id.eq(id.value()))
            .filter(workflows::Column::UserId.eq(owner.value()));

        if let Some(title) = &update.title {
            query = query.col_expr(workflows::Column::Title, Expr::value(title.clone()));
        }
        if let Some(description) = &update.description {
            query = query.col_expr(
                workflows::Column::Description,
                Expr::value(description.clone()),
            );
        }
        if let Some(tags) = &update.tags {
            let tags = normalize_tags(tags.iter().cloned());
            query = query.col_expr(workflows::Column::Tags, Expr::value(encode_list(&tags)?));
        }

        let result = query
            .exec(&self.conn)
            .await
            .context("Failed to update workflow")?;

        Ok(result.rows_affected > 0)
    }

    /// Returns false when no row matched `(id, owner)`.
    pub async fn delete(&self, id: WorkflowId, owner: UserId) -> Result<bool> {
        let result = workflows::Entity::delete_many()
            .filter(workflows::Column::Id.eq(id.value()))
            .filter(workflows::Column::UserId.eq(owner.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete workflow")?;

        Ok(result.rows_affected > 0)
    }

    fn map_model(model: workflows::Model) -> Workflow {
        Workflow {
            id: WorkflowId::new(model.id),
            user_id: UserId::new(model.user_id),
            title: model.title,
            description: model.description,
            tags: decode_list(&model.tags),
            use_cases: decode_list(&model.use_cases),
            process_steps: decode_list(&model.process_steps),
            technical_features: decode_list(&model.technical_features),
            service_names: decode_list(&model.service_names),
            node_count: usize::try_from(model.node_count).unwrap_or_default(),
            trigger: model.trigger_name,
            raw_json: model.raw_json,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn encode_list(items: &[String]) -> Result<String> {
    serde_json::to_string(items).context("Failed to encode string list")
}

fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
