mod auth;
mod helpers;
mod mocks;
mod withdrawals;
