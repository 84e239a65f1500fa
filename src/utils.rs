//! Small algorithms shared between modules.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Density-based clustering used to group resources into expansion sites.
///
/// `neighbors` returns every point within the linkage distance of a given
/// point, including the point itself. Points whose neighborhood is smaller
/// than `min_points` and that are not reachable from a cluster end up in the
/// noise set.
pub(crate) fn dbscan<P, F>(data: &[P], neighbors: F, min_points: usize) -> (Vec<Vec<P>>, FxHashSet<P>)
where
	P: Eq + Hash + Clone,
	F: Fn(&P) -> Vec<P>,
{
	let mut clusters = Vec::<Vec<P>>::new();
	let mut noise = FxHashSet::<P>::default();
	let mut visited = FxHashSet::<P>::default();

	for p in data {
		if visited.contains(p) {
			continue;
		}
		visited.insert(p.clone());

		let seeds = neighbors(p);
		if seeds.len() < min_points {
			noise.insert(p.clone());
			continue;
		}

		let mut cluster = vec![p.clone()];
		let mut queue: Vec<P> = seeds;
		while let Some(q) = queue.pop() {
			if noise.remove(&q) {
				cluster.push(q);
				continue;
			}
			if !visited.insert(q.clone()) {
				continue;
			}
			let reachable = neighbors(&q);
			if reachable.len() >= min_points {
				queue.extend(reachable);
			}
			cluster.push(q);
		}
		clusters.push(cluster);
	}
	(clusters, noise)
}

/// Neighborhood function for [`dbscan`] over a fixed point set.
pub(crate) fn range_query<'a, P, D, F>(data: &'a [P], distance: F, epsilon: D) -> impl Fn(&P) -> Vec<P> + 'a
where
	P: Clone,
	D: PartialOrd + 'a,
	F: Fn(&P, &P) -> D + 'a,
{
	move |q: &P| {
		data.iter()
			.filter(|p| distance(q, p) <= epsilon)
			.cloned()
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clusters_split_on_distance() {
		let points: Vec<(i32, i32)> = vec![(0, 0), (1, 0), (0, 1), (10, 10), (11, 10), (30, 30)];
		let query = range_query(&points, |a, b| (a.0 - b.0).abs() + (a.1 - b.1).abs(), 2);
		let (clusters, noise) = dbscan(&points, query, 2);
		assert_eq!(clusters.len(), 2);
		let mut sizes: Vec<_> = clusters.iter().map(Vec::len).collect();
		sizes.sort_unstable();
		assert_eq!(sizes, vec![2, 3]);
		assert!(noise.contains(&(30, 30)));
	}

	#[test]
	fn lone_points_are_noise() {
		let points: Vec<(i32, i32)> = vec![(0, 0), (100, 100)];
		let query = range_query(&points, |a, b| (a.0 - b.0).abs() + (a.1 - b.1).abs(), 1);
		let (clusters, noise) = dbscan(&points, query, 2);
		assert!(clusters.is_empty());
		assert_eq!(noise.len(), 2);
	}
}
