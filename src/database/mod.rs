mod filter;

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, QueryBuilder, Result};
use uuid::Uuid;

use crate::models::dto::EquipmentFilter;
use crate::models::{Equipment, User};

/// Connects to a PostgreSQL database with the given `db_url`, returning a connection pool for accessing it
pub async fn connect_sqlx(db_url: &str) -> sqlx::PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .idle_timeout(Duration::from_secs(30))
        .max_connections(32)
        .min_connections(4)
        .connect(db_url)
        .await
        .expect("Could not connect to the database")
}

pub struct MaintenanceDatabase {
    pool: PgPool,
}

impl MaintenanceDatabase {
    pub fn new(pool: PgPool) -> Self {
        MaintenanceDatabase { pool }
    }

    /// Insert a fully populated user row.
    pub async fn create_user(&self, user: &User) -> Result<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO app_user \
             (id, username, email, full_name, role, is_active, must_change_password, \
              password_hash, created_at, last_login) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.role)
        .bind(user.is_active)
        .bind(user.must_change_password)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.last_login)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM app_user WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM app_user WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    /// Lookup against the stored (lowercased) email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM app_user WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// Uniqueness probe for registration: matches either field.
    pub async fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM app_user WHERE username = $1 OR email = $2")
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM app_user ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    /// Write back a merged user row (profile fields only).
    pub async fn update_user(&self, user: &User) -> Result<User> {
        sqlx::query_as::<_, User>(
            "UPDATE app_user \
             SET full_name = $1, email = $2, is_active = $3, role = $4 \
             WHERE id = $5 \
             RETURNING *",
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(&user.role)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
    }

    /// Replace a user's credential; `must_change_password` is set alongside
    /// (true for admin resets, false once the user picks their own).
    pub async fn set_password(
        &self,
        id: Uuid,
        password_hash: &str,
        must_change_password: bool,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE app_user SET password_hash = $1, must_change_password = $2 WHERE id = $3",
        )
        .bind(password_hash)
        .bind(must_change_password)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Record a successful login. The caller supplies the timestamp so the
    /// stored row and the response it echoes carry the same instant.
    pub async fn touch_last_login(&self, username: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE app_user SET last_login = $1 WHERE username = $2")
            .bind(at)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn create_equipment(&self, record: &Equipment) -> Result<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "INSERT INTO equipment \
             (id, area, equipment_type, nombre_pc, marca, modelo, serie, fecha, \
              tipo_mantenimiento, observaciones, tecnico_responsable, estado_equipo, \
              created_by, created_at, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(record.id)
        .bind(&record.area)
        .bind(&record.equipment_type)
        .bind(&record.nombre_pc)
        .bind(&record.marca)
        .bind(&record.modelo)
        .bind(&record.serie)
        .bind(record.fecha)
        .bind(&record.tipo_mantenimiento)
        .bind(&record.observaciones)
        .bind(&record.tecnico_responsable)
        .bind(&record.estado_equipo)
        .bind(&record.created_by)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(&record.updated_by)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_equipment_by_id(&self, id: Uuid) -> Result<Option<Equipment>> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Newest-created-first page of the full registry.
    pub async fn list_equipment(&self, skip: i64, limit: i64) -> Result<Vec<Equipment>> {
        sqlx::query_as::<_, Equipment>(
            "SELECT * FROM equipment ORDER BY created_at DESC OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Newest-created-first page of the registry matching `filters`.
    pub async fn filter_equipment(
        &self,
        filters: &EquipmentFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Equipment>> {
        let mut qb = QueryBuilder::new("SELECT * FROM equipment WHERE 1=1");
        filter::push_filters(&mut qb, filters);
        qb.push(" ORDER BY created_at DESC OFFSET ");
        qb.push_bind(skip);
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.build_query_as::<Equipment>().fetch_all(&self.pool).await
    }

    /// Write back a merged equipment row. `created_by`/`created_at` are not
    /// in the SET list, so they stay immutable at the storage layer too.
    pub async fn update_equipment(&self, record: &Equipment) -> Result<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "UPDATE equipment \
             SET area = $1, nombre_pc = $2, marca = $3, modelo = $4, serie = $5, \
                 fecha = $6, tipo_mantenimiento = $7, observaciones = $8, \
                 estado_equipo = $9, updated_at = $10, updated_by = $11 \
             WHERE id = $12 \
             RETURNING *",
        )
        .bind(&record.area)
        .bind(&record.nombre_pc)
        .bind(&record.marca)
        .bind(&record.modelo)
        .bind(&record.serie)
        .bind(record.fecha)
        .bind(&record.tipo_mantenimiento)
        .bind(&record.observaciones)
        .bind(&record.estado_equipo)
        .bind(record.updated_at)
        .bind(&record.updated_by)
        .bind(record.id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn delete_equipment(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_equipment(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM equipment")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn counts_by_equipment_type(&self) -> Result<Vec<(String, i64)>> {
        self.grouped_counts("equipment_type").await
    }

    pub async fn counts_by_estado(&self) -> Result<Vec<(String, i64)>> {
        self.grouped_counts("estado_equipo").await
    }

    pub async fn counts_by_tipo_mantenimiento(&self) -> Result<Vec<(String, i64)>> {
        self.grouped_counts("tipo_mantenimiento").await
    }

    /// Group-by-count over one column. Only values that occur appear; the
    /// dashboard intentionally has no zero-count categories.
    async fn grouped_counts(&self, column: &'static str) -> Result<Vec<(String, i64)>> {
        sqlx::query_as::<_, (String, i64)>(&format!(
            "SELECT {column}, COUNT(*) FROM equipment GROUP BY {column}"
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn recent_equipment(&self, limit: i64) -> Result<Vec<Equipment>> {
        sqlx::query_as::<_, Equipment>(
            "SELECT * FROM equipment ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
