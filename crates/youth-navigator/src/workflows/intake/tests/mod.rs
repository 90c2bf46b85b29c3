mod common;
mod flow;
mod session;
