// ABOUTME: Security utilities shared by the request middleware
// ABOUTME: Cookie parsing for the session token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! Security utilities for the HTTP surface

/// Request cookie parsing
pub mod cookies;
