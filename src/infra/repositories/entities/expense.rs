//! Expense database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Expense, ExpenseCategory};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Creator id; intentionally not a foreign key
    pub created_by: Option<Uuid>,
    pub title: String,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub date: DateTimeUtc,
    pub description: String,
    pub branch: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Stored categories are constrained by the service layer; a row outside the
/// fixed set indicates corrupted data.
impl TryFrom<Model> for Expense {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let category: ExpenseCategory = model.category.parse().map_err(|_| {
            AppError::internal(format!(
                "Expense {} has unknown category {:?}",
                model.id, model.category
            ))
        })?;

        Ok(Expense {
            id: model.id,
            created_by: model.created_by,
            title: model.title,
            category,
            amount: model.amount,
            date: model.date,
            description: model.description,
            branch: model.branch,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
