use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Query, State},
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{user, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect};
use derive_more::{Display, Error, From};

use super::UserData;
use crate::pagination::Pagination;

/// Errors that may occur during the user list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of registered users.")
        .response_with::<200, Json<Vec<UserData>>, _>(|op| {
            op.description("User list response.")
        })
}

/// List registered users in order of registration.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<UserData>>, UserListError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&*db)
        .await?;

    Ok(Json(users.into_iter().map(UserData::from).collect()))
}
