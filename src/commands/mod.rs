// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod settings;
pub mod statuses;
pub mod categories;
pub mod projects;
pub mod transactions;
pub mod attachments;
pub mod reports;
pub mod exporter;
pub mod doctor;
