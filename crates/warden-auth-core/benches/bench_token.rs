//! Benchmarks for token mint/verify hot paths

use chrono::Duration;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warden_auth_core::{constant_time_str_eq, JwtCodec, TokenCodec, TokenKeys, TokenKind};
use warden_types::{Role, UserId};

const ACCESS_PRIVATE_PEM: &str = include_str!("../tests/fixtures/access.pem");
const ACCESS_PUBLIC_PEM: &str = include_str!("../tests/fixtures/access.pub.pem");
const REFRESH_PRIVATE_PEM: &str = include_str!("../tests/fixtures/refresh.pem");
const REFRESH_PUBLIC_PEM: &str = include_str!("../tests/fixtures/refresh.pub.pem");

fn codec() -> JwtCodec {
    JwtCodec::new(
        TokenKeys::from_pem(ACCESS_PRIVATE_PEM.as_bytes(), ACCESS_PUBLIC_PEM.as_bytes()).unwrap(),
        TokenKeys::from_pem(REFRESH_PRIVATE_PEM.as_bytes(), REFRESH_PUBLIC_PEM.as_bytes())
            .unwrap(),
    )
}

fn bench_token_operations(c: &mut Criterion) {
    let codec = codec();
    let user_id = UserId::new();

    let mut group = c.benchmark_group("token");

    group.bench_function("mint_access", |b| {
        b.iter(|| {
            codec
                .mint(
                    TokenKind::Access,
                    black_box(user_id),
                    Some(Role::User),
                    Duration::minutes(15),
                )
                .unwrap()
        });
    });

    let token = codec
        .mint(TokenKind::Access, user_id, Some(Role::User), Duration::minutes(15))
        .unwrap();

    group.bench_function("verify_access", |b| {
        b.iter(|| codec.verify(TokenKind::Access, black_box(&token)).unwrap());
    });

    group.bench_function("verify_garbage", |b| {
        b.iter(|| codec.verify(TokenKind::Access, black_box("a.b.c")).is_err());
    });

    group.finish();
}

fn bench_refresh_comparison(c: &mut Criterion) {
    let codec = codec();
    let stored = codec
        .mint(TokenKind::Refresh, UserId::new(), None, Duration::days(7))
        .unwrap();
    let presented = stored.clone();

    c.bench_function("refresh_constant_time_eq", |b| {
        b.iter(|| constant_time_str_eq(black_box(&stored), black_box(&presented)));
    });
}

criterion_group!(benches, bench_token_operations, bench_refresh_comparison);
criterion_main!(benches);
