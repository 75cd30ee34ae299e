mod auth_flow;
mod browse;
mod cache;
mod wishlist;
