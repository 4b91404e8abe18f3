use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;
use volterra::data::观测序列;
use volterra::interfaces::静默界面;
use volterra::objectives::default::默认目标函数;
use volterra::objectives::metric::误差指标;
use volterra::objectives::目标函数;
use volterra::optimizers::simulated_annealing::退火方法;
use volterra::simulator::{模拟, 积分选项};
use volterra::错误;

fn 合成观测() -> Result<观测序列, 错误> {
    let 时间: Vec<f64> = (0..100).map(|i| i as f64 * 0.2).collect();
    let (猎物, 捕食者) = 模拟(
        &[1.0, 0.5, 0.75, 0.25],
        [10.0, 5.0],
        &时间,
        &积分选项::default(),
    )?;
    观测序列::新建(时间, 猎物, 捕食者)
}

fn 单次评估(b: &mut Criterion) {
    let 观测 = 合成观测().unwrap();
    let mut 目标函数 = 默认目标函数::新建(&观测, 误差指标::RMSE, 积分选项::default());
    b.bench_function("单次评估", |b| {
        b.iter(|| 目标函数.计算(black_box(&[0.9, 0.45, 0.8, 0.3])))
    });
}

fn 短程退火(b: &mut Criterion) {
    let 观测 = 合成观测().unwrap();
    let 方法 = 退火方法 {
        n_iter: 100,
        n_inner: 10,
        ..退火方法::default()
    };
    let mut rng = StdRng::seed_from_u64(12345);
    b.bench_function("短程退火", |b| {
        b.iter(|| {
            let mut 目标函数 = 默认目标函数::新建(&观测, 误差指标::RMSE, 积分选项::default());
            方法.优化(&方法.初始解(), &mut 目标函数, &mut rng, &静默界面)
        })
    });
}

criterion_group!(benches, 单次评估, 短程退火);
criterion_main!(benches);
