use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{
    db::Db,
    models::{Role, UserProfileRow},
    pagination::LimitOffset,
};

const PROFILE_COLUMNS: &str = "id, name, role, city, state, fide_id, bio, phone, \
     profile_photo_url, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub city: String,
    pub state: String,
    pub fide_id: Option<String>,
    pub phone: Option<String>,
    pub profile_photo_url: Option<String>,
}

/// Owner-editable subset; role and photo change through dedicated paths.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub fide_id: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ProfileRepo {
    pool: Db,
}

impl ProfileRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<UserProfileRow>> {
        sqlx::query_as::<_, UserProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// First submission creates the row; resubmission overwrites the owner's
    /// own fields. Conflict target is the identity subject id.
    pub async fn upsert(&self, profile: &NewProfile) -> SqlxResult<UserProfileRow> {
        sqlx::query_as::<_, UserProfileRow>(&format!(
            r#"
            INSERT INTO user_profiles (id, name, role, city, state, fide_id, phone, profile_photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                role = EXCLUDED.role,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                fide_id = EXCLUDED.fide_id,
                phone = EXCLUDED.phone,
                profile_photo_url = COALESCE(EXCLUDED.profile_photo_url, user_profiles.profile_photo_url),
                updated_at = now()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(&profile.name)
        .bind(profile.role)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.fide_id)
        .bind(&profile.phone)
        .bind(&profile.profile_photo_url)
        .fetch_one(&self.pool)
        .await
    }

    /// Plain insert for the thin JSON create endpoint; an existing row is a
    /// unique violation the caller maps to a client error.
    pub async fn create(&self, profile: &NewProfile) -> SqlxResult<UserProfileRow> {
        sqlx::query_as::<_, UserProfileRow>(&format!(
            r#"
            INSERT INTO user_profiles (id, name, role, city, state, fide_id, phone, profile_photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(&profile.name)
        .bind(profile.role)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.fide_id)
        .bind(&profile.phone)
        .bind(&profile.profile_photo_url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, update: &ProfileUpdate) -> SqlxResult<Option<UserProfileRow>> {
        sqlx::query_as::<_, UserProfileRow>(&format!(
            r#"
            UPDATE user_profiles SET
                name = COALESCE($2, name),
                city = COALESCE($3, city),
                state = COALESCE($4, state),
                fide_id = COALESCE($5, fide_id),
                bio = COALESCE($6, bio),
                updated_at = now()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.city)
        .bind(&update.state)
        .bind(&update.fide_id)
        .bind(&update.bio)
        .fetch_optional(&self.pool)
        .await
    }

    /// Replaces the public URL reference; the previous blob is left in place.
    pub async fn set_photo_url(&self, id: Uuid, url: &str) -> SqlxResult<Option<UserProfileRow>> {
        sqlx::query_as::<_, UserProfileRow>(&format!(
            r#"
            UPDATE user_profiles
            SET profile_photo_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list(
        &self,
        filter: ProfileFilter,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<UserProfileRow>> {
        let page = page.unwrap_or_default();

        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE 1=1"
        ));

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query.push(" AND (LOWER(name) LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR LOWER(city) LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        query.push(" ORDER BY name ASC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        query
            .build_query_as::<UserProfileRow>()
            .fetch_all(&self.pool)
            .await
    }
}
