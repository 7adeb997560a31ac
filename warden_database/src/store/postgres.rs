use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;
use warden_core::id::{RoleId, UserId};

use super::{
    DeleteOutcome,
    IdentityStore,
    InsertOutcome,
    NewRole,
    NewUser,
    RoleModel,
    UpdateOutcome,
    UserModel,
    UserUpdate,
};
use crate::StoreResult;



#[derive(FromRow)]
struct IntermediateRoleModel {
    id: i32,

    name: String,

    description: String,

    created_at: DateTime<Utc>,
}

impl IntermediateRoleModel {
    fn into_role_model(self) -> RoleModel {
        RoleModel {
            id: RoleId::new(self.id),
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}


#[derive(FromRow)]
struct IntermediateUserModel {
    id: Uuid,

    username: String,

    hashed_password: String,

    created_at: DateTime<Utc>,

    last_modified_at: DateTime<Utc>,
}

impl IntermediateUserModel {
    fn into_user_model(self, roles: Vec<RoleModel>) -> UserModel {
        UserModel {
            id: UserId::new(self.id),
            username: self.username,
            hashed_password: self.hashed_password,
            roles,
            created_at: self.created_at,
            last_modified_at: self.last_modified_at,
        }
    }
}


#[derive(FromRow)]
struct IntermediateUserRoleModel {
    user_id: Uuid,

    #[sqlx(flatten)]
    role: IntermediateRoleModel,
}



/// Loads the roles of a single user, in their assigned order.
async fn roles_of_user(
    database_connection: &mut PgConnection,
    user_id: Uuid,
) -> StoreResult<Vec<RoleModel>> {
    let intermediate_roles: Vec<IntermediateRoleModel> = sqlx::query_as(
        r#"
        SELECT
            warden.role.id, warden.role.name,
            warden.role.description, warden.role.created_at
        FROM warden.user_role
        INNER JOIN warden.role
            ON warden.role.id = warden.user_role.role_id
        WHERE warden.user_role.user_id = $1
        ORDER BY warden.user_role.position ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *database_connection)
    .await?;

    Ok(intermediate_roles
        .into_iter()
        .map(IntermediateRoleModel::into_role_model)
        .collect())
}


async fn user_with_roles(
    database_connection: &mut PgConnection,
    intermediate_user: Option<IntermediateUserModel>,
) -> StoreResult<Option<UserModel>> {
    let Some(intermediate_user) = intermediate_user else {
        return Ok(None);
    };

    let roles = roles_of_user(database_connection, intermediate_user.id).await?;

    Ok(Some(intermediate_user.into_user_model(roles)))
}



/// An [`IdentityStore`] backed by PostgreSQL (schema `warden`).
///
/// Name uniqueness is enforced by `UNIQUE` constraints, and inserts use
/// `ON CONFLICT DO NOTHING`, so a lost race is reported as [`InsertOutcome::AlreadyExists`].
/// User updates run in a single transaction.
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies any pending migrations (see the `migrations` directory of this crate).
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;

        info!("Database migrations are up to date.");

        Ok(())
    }
}


#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn role_by_name(&self, role_name: &str) -> StoreResult<Option<RoleModel>> {
        let intermediate_role: Option<IntermediateRoleModel> = sqlx::query_as(
            r#"
            SELECT id, name, description, created_at
            FROM warden.role
            WHERE name = $1
            "#,
        )
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(intermediate_role.map(IntermediateRoleModel::into_role_model))
    }

    async fn all_roles(&self) -> StoreResult<Vec<RoleModel>> {
        let intermediate_roles: Vec<IntermediateRoleModel> = sqlx::query_as(
            r#"
            SELECT id, name, description, created_at
            FROM warden.role
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(intermediate_roles
            .into_iter()
            .map(IntermediateRoleModel::into_role_model)
            .collect())
    }

    async fn insert_role(&self, new_role: NewRole) -> StoreResult<InsertOutcome<RoleModel>> {
        let inserted_role: Option<IntermediateRoleModel> = sqlx::query_as(
            r#"
            INSERT INTO warden.role (name, description, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT unique__role__name DO NOTHING
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&new_role.name)
        .bind(&new_role.description)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        let Some(inserted_role) = inserted_role else {
            return Ok(InsertOutcome::AlreadyExists);
        };

        debug!(
            role_id = inserted_role.id,
            role_name = %inserted_role.name,
            "Inserted role."
        );

        Ok(InsertOutcome::Inserted(inserted_role.into_role_model()))
    }

    async fn update_role_description(
        &self,
        role_name: &str,
        new_description: String,
    ) -> StoreResult<UpdateOutcome<RoleModel>> {
        let updated_role: Option<IntermediateRoleModel> = sqlx::query_as(
            r#"
            UPDATE warden.role
            SET description = $1
            WHERE name = $2
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(new_description)
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match updated_role {
            Some(updated_role) => UpdateOutcome::Updated(updated_role.into_role_model()),
            None => UpdateOutcome::NotFound,
        })
    }

    async fn delete_role(&self, role_name: &str) -> StoreResult<DeleteOutcome> {
        let query_result = sqlx::query("DELETE FROM warden.role WHERE name = $1")
            .bind(role_name)
            .execute(&self.pool)
            .await?;

        Ok(match query_result.rows_affected() {
            0 => DeleteOutcome::NotFound,
            _ => DeleteOutcome::Deleted,
        })
    }


    async fn user_by_username(&self, username: &str) -> StoreResult<Option<UserModel>> {
        let mut connection = self.pool.acquire().await?;

        let intermediate_user: Option<IntermediateUserModel> = sqlx::query_as(
            r#"
            SELECT id, username, hashed_password, created_at, last_modified_at
            FROM warden.user
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *connection)
        .await?;

        user_with_roles(&mut connection, intermediate_user).await
    }

    async fn user_by_id(&self, user_id: UserId) -> StoreResult<Option<UserModel>> {
        let mut connection = self.pool.acquire().await?;

        let intermediate_user: Option<IntermediateUserModel> = sqlx::query_as(
            r#"
            SELECT id, username, hashed_password, created_at, last_modified_at
            FROM warden.user
            WHERE id = $1
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_optional(&mut *connection)
        .await?;

        user_with_roles(&mut connection, intermediate_user).await
    }

    async fn all_users(&self) -> StoreResult<Vec<UserModel>> {
        let mut transaction = self.pool.begin().await?;

        let intermediate_users: Vec<IntermediateUserModel> = sqlx::query_as(
            r#"
            SELECT id, username, hashed_password, created_at, last_modified_at
            FROM warden.user
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&mut *transaction)
        .await?;

        let intermediate_user_roles: Vec<IntermediateUserRoleModel> = sqlx::query_as(
            r#"
            SELECT
                warden.user_role.user_id,
                warden.role.id, warden.role.name,
                warden.role.description, warden.role.created_at
            FROM warden.user_role
            INNER JOIN warden.role
                ON warden.role.id = warden.user_role.role_id
            ORDER BY warden.user_role.user_id ASC, warden.user_role.position ASC
            "#,
        )
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;


        let mut roles_by_user_id: HashMap<Uuid, Vec<RoleModel>> = HashMap::new();
        for user_role in intermediate_user_roles {
            roles_by_user_id
                .entry(user_role.user_id)
                .or_default()
                .push(user_role.role.into_role_model());
        }

        Ok(intermediate_users
            .into_iter()
            .map(|intermediate_user| {
                let roles = roles_by_user_id
                    .remove(&intermediate_user.id)
                    .unwrap_or_default();

                intermediate_user.into_user_model(roles)
            })
            .collect())
    }

    async fn insert_user(&self, new_user: NewUser) -> StoreResult<InsertOutcome<UserModel>> {
        let creation_time = Utc::now();

        let inserted_user: Option<IntermediateUserModel> = sqlx::query_as(
            r#"
            INSERT INTO warden.user
                (id, username, hashed_password, created_at, last_modified_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT ON CONSTRAINT unique__user__username DO NOTHING
            RETURNING id, username, hashed_password, created_at, last_modified_at
            "#,
        )
        .bind(UserId::generate().into_uuid())
        .bind(&new_user.username)
        .bind(&new_user.hashed_password)
        .bind(creation_time)
        .fetch_optional(&self.pool)
        .await?;

        let Some(inserted_user) = inserted_user else {
            return Ok(InsertOutcome::AlreadyExists);
        };

        debug!(
            user_id = %inserted_user.id,
            username = %inserted_user.username,
            "Inserted user."
        );

        Ok(InsertOutcome::Inserted(
            inserted_user.into_user_model(Vec::new()),
        ))
    }

    async fn update_user(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> StoreResult<UpdateOutcome<UserModel>> {
        let mut transaction = self.pool.begin().await?;

        let updated_user: Option<IntermediateUserModel> = sqlx::query_as(
            r#"
            UPDATE warden.user
            SET
                hashed_password = COALESCE($1, hashed_password),
                last_modified_at = $2
            WHERE username = $3
            RETURNING id, username, hashed_password, created_at, last_modified_at
            "#,
        )
        .bind(update.hashed_password)
        .bind(Utc::now())
        .bind(username)
        .fetch_optional(&mut *transaction)
        .await?;

        let Some(updated_user) = updated_user else {
            // Nothing was changed, the transaction is simply dropped (rolled back).
            return Ok(UpdateOutcome::NotFound);
        };


        if let Some(role_ids) = update.role_ids {
            let role_ids = role_ids
                .into_iter()
                .map(RoleId::into_inner)
                .collect::<Vec<_>>();

            sqlx::query("DELETE FROM warden.user_role WHERE user_id = $1")
                .bind(updated_user.id)
                .execute(&mut *transaction)
                .await?;

            // The join skips roles that have been deleted in the meantime.
            sqlx::query(
                r#"
                INSERT INTO warden.user_role (user_id, position, role_id)
                    SELECT $1, submitted.position::integer, warden.role.id
                    FROM UNNEST($2::integer[]) WITH ORDINALITY
                        AS submitted(role_id, position)
                    INNER JOIN warden.role
                        ON warden.role.id = submitted.role_id
                "#,
            )
            .bind(updated_user.id)
            .bind(role_ids.as_slice())
            .execute(&mut *transaction)
            .await?;
        }

        let roles = roles_of_user(&mut transaction, updated_user.id).await?;

        transaction.commit().await?;

        Ok(UpdateOutcome::Updated(
            updated_user.into_user_model(roles),
        ))
    }

    async fn delete_user(&self, username: &str) -> StoreResult<DeleteOutcome> {
        let query_result = sqlx::query("DELETE FROM warden.user WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(match query_result.rows_affected() {
            0 => DeleteOutcome::NotFound,
            _ => DeleteOutcome::Deleted,
        })
    }
}



#[cfg(test)]
mod test {
    use std::sync::Arc;

    use warden_core::password_hasher::{ArgonHasher, PasswordHashingParameters};

    use super::*;
    use crate::registry::{
        RoleCreationResult,
        RoleRegistry,
        UserEdit,
        UserRegistry,
        UserUpdateResult,
    };

    /// These tests run against a live database and are skipped by default.
    /// Run them with `WARDEN_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.
    const DATABASE_URL_VARIABLE: &str = "WARDEN_TEST_DATABASE_URL";

    async fn migrated_store() -> Arc<dyn IdentityStore> {
        let database_url = std::env::var(DATABASE_URL_VARIABLE)
            .unwrap_or_else(|_| panic!("{DATABASE_URL_VARIABLE} is not set"));

        let store = PostgresIdentityStore::new(PgPool::connect(&database_url).await.unwrap());
        store.migrate().await.unwrap();

        Arc::new(store)
    }

    /// Names are made unique per run, since the database is shared between runs.
    fn unique_name(prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::now_v7().simple())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "needs a PostgreSQL database"]
    async fn concurrent_adds_of_one_name_create_exactly_one_role() {
        const CONCURRENT_CALLERS: usize = 32;

        let registry = RoleRegistry::new(migrated_store().await);
        let role_name = unique_name("contested");

        let handles = (0..CONCURRENT_CALLERS)
            .map(|_| {
                let registry = registry.clone();
                let role_name = role_name.clone();
                tokio::spawn(async move { registry.add_role(&role_name, None).await })
            })
            .collect::<Vec<_>>();

        let mut created_count = 0;
        for handle in handles {
            if let RoleCreationResult::Created(_) = handle.await.unwrap().unwrap() {
                created_count += 1;
            }
        }

        assert_eq!(created_count, 1);
        assert_eq!(
            registry
                .list_role_names()
                .await
                .unwrap()
                .iter()
                .filter(|name| **name == role_name)
                .count(),
            1
        );
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL database"]
    async fn user_roles_keep_submitted_order_and_repeats() {
        let store = migrated_store().await;

        let roles = RoleRegistry::new(store.clone());
        let users = UserRegistry::new(
            store,
            Arc::new(
                ArgonHasher::new(PasswordHashingParameters {
                    memory_cost_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                })
                .unwrap(),
            ),
        );

        let first_role = unique_name("first");
        let second_role = unique_name("second");
        let username = unique_name("user");

        roles.add_role(&first_role, None).await.unwrap();
        roles.add_role(&second_role, None).await.unwrap();
        users.add_user(&username, "pw").await.unwrap();

        let UserUpdateResult::Updated(user) = users
            .edit_user(
                &username,
                UserEdit {
                    new_password: None,
                    role_names: Some(vec![
                        second_role.clone(),
                        first_role.clone(),
                        second_role.clone(),
                    ]),
                },
            )
            .await
            .unwrap()
        else {
            panic!("user should exist");
        };

        let role_names = user
            .roles
            .iter()
            .map(|role| role.name.clone())
            .collect::<Vec<_>>();
        assert_eq!(role_names, vec![second_role.clone(), first_role, second_role]);

        users.remove_user(&username).await.unwrap();
    }
}
