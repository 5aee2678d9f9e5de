#[derive(Debug)]
pub struct StageRegistrationDTO {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub district: String,
    pub taluka: String,
    pub police_station: String,
    pub ttl: i64,
}

#[derive(Debug)]
pub struct PromoteRegistrationDTO {
    pub email: String,
    pub code: String,
}
