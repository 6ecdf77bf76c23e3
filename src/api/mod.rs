// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/api/mod.rs
// Version: 0.3.0
//
// Module declaration for the metadata service client.
//
// Tree Location:
// - src/api/mod.rs (api module entry point)
// - Submodules: client

pub mod client;

pub use client::{MetadataClient, MetadataSource};
