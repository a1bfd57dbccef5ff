//! # Seeded sampling primitives shared by every stochastic phase
//!
//! All draws go through the single build RNG so that a fixed seed reproduces
//! the exact decklist and insertion order.
use rand::Rng;

/// Sample up to k unique names from a (name, weight) pool without
/// replacement. Zero/negative weights never get picked; stops early when
/// total weight reaches zero.
pub fn weighted_sample_without_replacement<R: Rng>(
  rng: &mut R,
  pool: &[(String, f64)],
  k: usize,
) -> Vec<String> {
  if k == 0 || pool.is_empty() {
    return Vec::new();
  }
  let mut working: Vec<(String, f64)> = pool.to_vec();
  let mut chosen = Vec::with_capacity(k.min(working.len()));
  while !working.is_empty() && chosen.len() < k {
    let total: f64 = working.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
      break;
    }
    let roll = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    let mut pick = 0;
    for (idx, (_, w)) in working.iter().enumerate() {
      acc += w.max(0.0);
      if roll <= acc {
        pick = idx;
        break;
      }
    }
    let (name, _) = working.remove(pick);
    chosen.push(name);
  }
  chosen
}

/// Weighted shuffle: repeatedly sample without replacement until the pool is
/// exhausted. Heavier items tend to come first.
pub fn weighted_shuffle<R: Rng>(rng: &mut R, pool: &[(String, f64)]) -> Vec<String> {
  weighted_sample_without_replacement(rng, pool, pool.len())
}

/// Uniform f64 in [lo, hi)
pub fn uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
  if hi <= lo {
    return lo;
  }
  rng.gen_range(lo, hi)
}

/// How many additional cards a category should add, applying a random bonus
/// of up to `bonus_max_pct` of the configured target. Returns
/// (to_add, bonus); to_add is 0 when the target is already satisfied and the
/// bonus does not push past it.
pub fn adjusted_target<R: Rng>(
  rng: &mut R,
  label: &str,
  configured: u32,
  existing: u32,
  bonus_max_pct: f64,
) -> (u32, u32) {
  if configured == 0 {
    return (0, 0);
  }
  let roll = uniform(rng, 0.0, bonus_max_pct);
  let bonus = (configured as f64 * roll).ceil() as u32;
  if existing >= configured {
    let to_add = (configured + bonus).saturating_sub(existing);
    if to_add == 0 {
      debug!("{}: target met ({}/{}), bonus {} adds nothing", label, existing, configured, bonus);
    }
    (to_add, bonus)
  } else {
    let to_add = (configured - existing) + bonus;
    debug!(
      "{}: existing {}/{}, bonus {}, adding {}",
      label, existing, configured, bonus, to_add
    );
    (to_add, bonus)
  }
}

#[cfg(test)]
mod tests {
  use crate::sampling::*;
  use rand::rngs::SmallRng;
  use rand::SeedableRng;

  fn pool(names: &[(&str, f64)]) -> Vec<(String, f64)> {
    names.iter().map(|(n, w)| (n.to_string(), *w)).collect()
  }

  #[test]
  fn sample_is_deterministic_for_seed() {
    let p = pool(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 1.0)]);
    let mut r1 = SmallRng::seed_from_u64(42);
    let mut r2 = SmallRng::seed_from_u64(42);
    assert_eq!(
      weighted_sample_without_replacement(&mut r1, &p, 3),
      weighted_sample_without_replacement(&mut r2, &p, 3)
    );
  }

  #[test]
  fn sample_never_repeats() {
    let p = pool(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
    let mut rng = SmallRng::seed_from_u64(7);
    let out = weighted_sample_without_replacement(&mut rng, &p, 10);
    assert_eq!(out.len(), 3);
    let mut sorted = out.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 3);
  }

  #[test]
  fn zero_weight_never_picked() {
    let p = pool(&[("a", 0.0), ("b", 1.0)]);
    let mut rng = SmallRng::seed_from_u64(1);
    let out = weighted_sample_without_replacement(&mut rng, &p, 2);
    assert_eq!(out, vec!["b".to_string()]);
  }

  #[test]
  fn heavier_items_win_more_often() {
    let p = pool(&[("heavy", 10.0), ("light", 1.0)]);
    let mut firsts = 0;
    for seed in 0..200 {
      let mut rng = SmallRng::seed_from_u64(seed);
      let out = weighted_shuffle(&mut rng, &p);
      if out[0] == "heavy" {
        firsts += 1;
      }
    }
    assert!(firsts > 150, "heavy first only {} of 200", firsts);
  }

  #[test]
  fn adjusted_target_shortfall_includes_bonus() {
    let mut rng = SmallRng::seed_from_u64(3);
    let (to_add, bonus) = adjusted_target(&mut rng, "Ramp", 8, 2, 0.2);
    assert!(to_add >= 6);
    assert_eq!(to_add, 6 + bonus);
    assert!(bonus <= 2);
  }

  #[test]
  fn adjusted_target_met_can_be_zero() {
    let mut rng = SmallRng::seed_from_u64(3);
    let (to_add, _bonus) = adjusted_target(&mut rng, "Ramp", 8, 10, 0.2);
    assert_eq!(to_add, 0);
    let (to_add, _) = adjusted_target(&mut rng, "Ramp", 0, 0, 0.2);
    assert_eq!(to_add, 0);
  }
}
