use chrono::NaiveDate;

/// Fields persisted for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub password_hash: String,
    pub preferences: Vec<String>,
}
