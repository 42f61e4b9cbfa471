// SPDX-License-Identifier: GPL-3.0-only

pub(crate) mod paths;
pub(crate) mod proxies;
