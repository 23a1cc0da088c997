//! User operations.

use super::{assigned_uid, load_node, Node, Rows, Store};
use crate::context::Context;
use crate::entity::{Id, User};
use crate::error::StoreResult;
use crate::schema;
use crate::transaction::{vars, Txn};
use chrono::{DateTime, Utc};
use dgql_graph::{Mutation, Uid};
use serde_json::json;

impl Store {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// [`crate::StoreError::Mutation`] or [`crate::StoreError::Commit`] if
    /// another user already has `email`, plus the usual scope errors.
    pub fn create_user(
        &self,
        ctx: &Context,
        creation: DateTime<Utc>,
        email: &str,
        display_name: &str,
    ) -> StoreResult<User> {
        let id = Id::new();
        let uid = self.transact(ctx, |txn| {
            let assigned = txn.mutate(&Mutation::set(json!({
                "uid": "_:user",
                "dgraph.type": schema::USER,
                "User.id": id,
                "User.creation": creation,
                "User.email": email,
                "User.displayName": display_name,
            })))?;
            assigned_uid(&assigned, "user")
        })?;

        tracing::debug!(%uid, %id, "user created");
        Ok(User {
            uid,
            id,
            creation,
            email: email.to_owned(),
            display_name: display_name.to_owned(),
        })
    }

    /// Looks up a user by domain ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope or the query fails.
    pub fn user(&self, ctx: &Context, id: &Id) -> StoreResult<Option<User>> {
        self.transact(ctx, |txn| find_user(txn, id))
    }

    /// Looks up a user by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope or the query fails.
    pub fn user_by_uid(&self, ctx: &Context, uid: Uid) -> StoreResult<Option<User>> {
        self.transact(ctx, |txn| {
            Ok(match load_node(txn, uid)? {
                Some(Node::User(user)) => Some(user),
                _ => None,
            })
        })
    }
}

pub(crate) fn find_user(txn: &mut Txn, id: &Id) -> StoreResult<Option<User>> {
    let query = format!(
        "query user($id: string) {{ node(func: eq(User.id, $id)) {{ {} }} }}",
        schema::USER_FIELDS
    );
    let rows: Rows<User> = txn.query_with_vars(&query, &vars([("$id", id.as_str())]))?;
    Ok(rows.first())
}
