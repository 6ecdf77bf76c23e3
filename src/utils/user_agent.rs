// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/user_agent.rs
// Version: 0.3.0
//
// User agent sent to the metadata service.

pub fn user_agent() -> String {
    format!(
        "algo-bench/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
