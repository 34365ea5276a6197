pub mod basic;
pub mod cookies;
pub mod jwt;
pub mod local;
pub mod oauth;
pub mod password;
