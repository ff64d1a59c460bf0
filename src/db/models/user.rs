//! User model

use serde::{Deserialize, Serialize};

/// Access roles (RBAC), matching the back-office organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Gestion,
    Comptable,
    Employe,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Gestion => "gestion",
            Self::Comptable => "comptable",
            Self::Employe => "employe",
        }
    }
}

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 hash, never serialized in responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Create user payload (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub role: Option<UserRole>,
}

/// Update user payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = User::hash_password("correct horse battery").unwrap();
        let user = User {
            id: 1,
            email: "a@b.fr".into(),
            password_hash: hash,
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            role: UserRole::Employe,
            is_active: true,
            last_login_at: None,
            created_at: 0,
            updated_at: 0,
        };
        assert!(user.verify_password("correct horse battery").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            email: "a@b.fr".into(),
            password_hash: "$argon2id$secret".into(),
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            role: UserRole::Admin,
            is_active: true,
            last_login_at: None,
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
