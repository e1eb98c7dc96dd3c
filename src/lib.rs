// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod convert;
pub mod db;
pub mod errors;
pub mod models;
pub mod repo;
pub mod utils;
pub mod validate;
