pub mod bin_store;
