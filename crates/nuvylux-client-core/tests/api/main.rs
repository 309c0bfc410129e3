mod auth;
mod health_check;
mod terminal_errors;
