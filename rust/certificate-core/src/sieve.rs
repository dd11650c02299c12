//! Prime enumeration for the right-edge prime sums.

/// Sieve of Eratosthenes: all primes `<= bound`, in increasing order.
///
/// Runs in O(P log log P) time over a `bound + 1` boolean table.
/// Bounds below 2 yield an empty list.
pub fn sieve_primes(bound: u64) -> Vec<u64> {
    if bound < 2 {
        return Vec::new();
    }
    let n = bound as usize;
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut i = 2;
    while i * i <= n {
        if is_prime[i] {
            let mut j = i * i;
            while j <= n {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .filter(|(_, &p)| p)
        .map(|(k, _)| k as u64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sieve_primes() {
        assert_eq!(sieve_primes(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_sieve_degenerate() {
        assert!(sieve_primes(0).is_empty());
        assert!(sieve_primes(1).is_empty());
        assert_eq!(sieve_primes(2), vec![2]);
        assert_eq!(sieve_primes(3), vec![2, 3]);
        assert_eq!(sieve_primes(4), vec![2, 3]);
    }

    #[test]
    fn test_prime_counts() {
        // pi(10^k) for small k
        assert_eq!(sieve_primes(100).len(), 25);
        assert_eq!(sieve_primes(1_000).len(), 168);
        assert_eq!(sieve_primes(100_000).len(), 9_592);
    }

    #[test]
    fn test_square_bound_included() {
        // 49 = 7^2 must be struck, 47 kept.
        let primes = sieve_primes(49);
        assert_eq!(primes.last(), Some(&47));
        assert!(!primes.contains(&49));
    }
}
