use rand::rngs::StdRng;
use rand::SeedableRng;
use volterra::data::观测序列;
use volterra::interfaces::静默界面;
use volterra::objectives::default::默认目标函数;
use volterra::objectives::metric::误差指标;
use volterra::operators::default::{均匀扰动, 算术杂交, 高斯扰动};
use volterra::operators::{变异, 杂交};
use volterra::optimizers::genetic::遗传算法;
use volterra::optimizers::hill_climbing::爬山方法;
use volterra::optimizers::simulated_annealing::{
    展开轨迹, 接受, 退火方法, 降温方式, 降温时间表,
};
use volterra::optimizers::惩罚误差;
use volterra::simulator::{模拟, 积分选项, 积分错误};
use volterra::参数向量;

fn 合成观测() -> 观测序列 {
    let 时间: Vec<f64> = (0..30).map(|i| i as f64 * 0.5).collect();
    let (猎物, 捕食者) = 模拟(
        &[1.0, 0.5, 0.75, 0.25],
        [10.0, 5.0],
        &时间,
        &积分选项::default(),
    )
    .unwrap();
    观测序列::新建(时间, 猎物, 捕食者).unwrap()
}

fn 二次函数(参数: &参数向量) -> Result<f64, 积分错误> {
    Ok(参数.iter().map(|x| (x - 1.0).powi(2)).sum())
}

fn 单调不增(轨迹: &[f64]) -> bool {
    轨迹.windows(2).all(|w| w[1] <= w[0])
}

#[test]
fn 均匀扰动不超出取值范围() {
    let mut rng = StdRng::seed_from_u64(1);
    let 操作 = 均匀扰动::新建(3.0);
    let mut 参数 = [0.0, 10.0, 5.0, 0.5];
    for _ in 0..1000 {
        let 新参数 = 操作.变异(&参数, &mut rng);
        for (x, y) in 参数.iter().zip(&新参数) {
            assert!((0.0..=10.0).contains(y));
            assert!((x - y).abs() <= 3.0);
        }
        参数 = 新参数;
    }
}

#[test]
fn 高斯扰动不产生负数() {
    let mut rng = StdRng::seed_from_u64(2);
    let 操作 = 高斯扰动::default();
    for _ in 0..1000 {
        let 新参数 = 操作.变异(&[0.0, 0.01, 1.0, 2.0], &mut rng);
        assert!(新参数.iter().all(|&x| x >= 0.0));
    }
}

#[test]
fn 算术杂交在两个父代之间() {
    let mut rng = StdRng::seed_from_u64(3);
    let 父代一 = [0.0, 1.0, 2.0, 3.0];
    let 父代二 = [1.0, 3.0, 2.0, 0.0];
    for _ in 0..100 {
        let 子代 = 算术杂交.杂交(&父代一, &父代二, &mut rng);
        for i in 0..4 {
            let (低, 高) = (父代一[i].min(父代二[i]), 父代一[i].max(父代二[i]));
            assert!(子代[i] >= 低 - 1e-12 && 子代[i] <= 高 + 1e-12);
        }
    }
}

#[test]
fn 爬山轨迹单调不增() {
    let 观测 = 合成观测();
    let mut 目标函数 = 默认目标函数::新建(&观测, 误差指标::RMSE, 积分选项::default());
    let mut rng = StdRng::seed_from_u64(12345);
    let 方法 = 爬山方法 {
        n_iter: 200,
        ..爬山方法::default()
    };
    let 结果 = 方法.优化(&方法.初始解(), &mut 目标函数, &mut rng, &静默界面);
    assert_eq!(结果.轨迹.len(), 201);
    assert!(单调不增(&结果.轨迹));
    assert!(结果.分数 <= 结果.轨迹[0]);
    assert_eq!(结果.分数, *结果.轨迹.last().unwrap());
    assert_eq!(目标函数.评估次数(), 201);
}

#[test]
fn 爬山不迭代时返回初始解() {
    let mut rng = StdRng::seed_from_u64(0);
    let 方法 = 爬山方法 {
        n_iter: 0,
        start: Some([2.0, 2.0, 2.0, 2.0]),
        ..爬山方法::default()
    };
    let mut 目标函数 = 二次函数;
    let 结果 = 方法.优化(&方法.初始解(), &mut 目标函数, &mut rng, &静默界面);
    assert_eq!(结果.参数, [2.0; 4]);
    assert_eq!(结果.分数, 4.0);
    assert_eq!(结果.轨迹, vec![4.0]);
}

#[test]
fn 爬山收敛到二次函数的最小值() {
    let mut rng = StdRng::seed_from_u64(7);
    let 方法 = 爬山方法 {
        n_iter: 3000,
        stepsize: 0.1,
        ..爬山方法::default()
    };
    let mut 目标函数 = 二次函数;
    let 结果 = 方法.优化(&方法.初始解(), &mut 目标函数, &mut rng, &静默界面);
    assert!(结果.分数 < 0.1);
}

#[test]
fn 积分失败时使用惩罚误差() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut 总是失败 = |_: &参数向量| -> Result<f64, 积分错误> { Err(积分错误::非有限值 { 时间: 0.0 }) };
    let 方法 = 爬山方法 {
        n_iter: 10,
        ..爬山方法::default()
    };
    let 结果 = 方法.优化(&方法.初始解(), &mut 总是失败, &mut rng, &静默界面);
    assert_eq!(结果.分数, 惩罚误差);
    assert!(结果.轨迹.iter().all(|&x| x == 惩罚误差));

    let mut 非有限 = |_: &参数向量| -> Result<f64, 积分错误> { Ok(f64::NAN) };
    let 退火 = 退火方法 {
        n_iter: 20,
        n_inner: 10,
        ..退火方法::default()
    };
    let 结果 = 退火.优化(&退火.初始解(), &mut 非有限, &mut rng, &静默界面);
    assert_eq!(结果.分数, 惩罚误差);
}

#[test]
fn 改进总是被接受() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..1000 {
        assert!(接受(-1e-9, 1e-6, &mut rng));
        assert!(接受(-5.0, 10.0, &mut rng));
    }
}

#[test]
fn 变差时按概率接受() {
    let mut rng = StdRng::seed_from_u64(42);
    let 次数 = 100_000;
    for (改进, 温度) in [(0.5, 1.0), (0.1, 0.05), (2.0, 4.0)] {
        let 接受次数 = (0..次数).filter(|_| 接受(改进, 温度, &mut rng)).count();
        let 频率 = 接受次数 as f64 / 次数 as f64;
        let 期望: f64 = (-改进 / 温度).exp();
        assert!((频率 - 期望).abs() < 0.01, "{频率} vs {期望}");
    }
}

#[test]
fn 平方降温严格递减() {
    let 时间表 = 降温时间表::新建(1.0, 1e-3, 100, 降温方式::Quadratic);
    assert_eq!(时间表.温度(0), 1.0);
    for k in 0..100 {
        assert!(时间表.温度(k + 1) < 时间表.温度(k));
    }
    assert!((时间表.温度(100) - 1e-3).abs() < 1e-12);
    assert_eq!(时间表.降温(1.0, 5), 时间表.温度(5));
}

#[test]
fn 指数和线性降温() {
    let 指数 = 降温时间表::新建(1.0, 1e-3, 11, 降温方式::Exponential);
    let mut 温度 = 1.0;
    for _ in 0..10 {
        温度 = 指数.降温(温度, 0);
    }
    assert!((温度 - 1e-3).abs() < 1e-12);

    let 线性 = 降温时间表::新建(1.0, 0.1, 9, 降温方式::Linear);
    let mut 温度 = 1.0;
    for _ in 0..9 {
        温度 = 线性.降温(温度, 0);
    }
    assert!((温度 - 0.1).abs() < 1e-12);
}

#[test]
fn 退火单轮() {
    let mut rng = StdRng::seed_from_u64(5);
    let 方法 = 退火方法 {
        n_iter: 25,
        n_inner: 25,
        ..退火方法::default()
    };
    assert_eq!(方法.轮数(), 1);
    let mut 目标函数 = 二次函数;
    let 结果 = 方法.优化(&方法.初始解(), &mut 目标函数, &mut rng, &静默界面);
    assert_eq!(结果.轨迹.len(), 2);
    assert_eq!(结果.轨迹[0], 4.0);
    assert_eq!(结果.分数, 结果.轨迹[1]);
}

#[test]
fn 退火轨迹长度与展开() {
    let 观测 = 合成观测();
    let mut 目标函数 = 默认目标函数::新建(&观测, 误差指标::MAE, 积分选项::default());
    let mut rng = StdRng::seed_from_u64(9);
    let 方法 = 退火方法 {
        n_iter: 200,
        n_inner: 20,
        ..退火方法::default()
    };
    let 结果 = 方法.优化(&方法.初始解(), &mut 目标函数, &mut rng, &静默界面);
    assert_eq!(结果.轨迹.len(), 11);
    assert_eq!(目标函数.评估次数(), 201);
    let 展开 = 展开轨迹(&结果.轨迹, 20);
    assert_eq!(展开.len(), 200);
    assert_eq!(展开[0], 结果.轨迹[1]);
    assert_eq!(展开[199], 结果.轨迹[10]);
    assert_eq!(展开轨迹(&[5.0, 4.0, 3.0], 2), vec![4.0, 4.0, 3.0, 3.0]);
}

#[test]
fn 退火记录最优解时轨迹单调不增() {
    let mut rng = StdRng::seed_from_u64(11);
    let 方法 = 退火方法 {
        n_iter: 500,
        n_inner: 10,
        t_max: 10.0,
        track_best: Some(true),
        ..退火方法::default()
    };
    let mut 目标函数 = 二次函数;
    let 结果 = 方法.优化(&方法.初始解(), &mut 目标函数, &mut rng, &静默界面);
    assert!(单调不增(&结果.轨迹));
    assert_eq!(结果.分数, 结果.轨迹.iter().copied().fold(f64::INFINITY, f64::min));
}

#[test]
fn 遗传算法种群规模不变且最优误差单调不增() {
    let 观测 = 合成观测();
    let mut 目标函数 = 默认目标函数::新建(&观测, 误差指标::RMSE, 积分选项::default());
    let mut rng = StdRng::seed_from_u64(2024);
    let 方法 = 遗传算法 {
        population_size: 20,
        generations: 5,
        parents: 10,
        mutation_rate: 0.3,
    };
    let 结果 = 方法.优化(&mut 目标函数, &mut rng, &静默界面);
    assert_eq!(结果.种群.len(), 20);
    assert_eq!(结果.最优轨迹.len(), 6);
    assert_eq!(结果.平均轨迹.len(), 6);
    assert!(单调不增(&结果.最优轨迹));
    assert_eq!(结果.分数, 结果.种群[0].分数);
    assert_eq!(结果.参数, 结果.种群[0].参数);
    assert!(结果.种群.windows(2).all(|w| w[0].分数 <= w[1].分数));
    for (最优, 平均) in 结果.最优轨迹.iter().zip(&结果.平均轨迹) {
        assert!(最优 <= 平均);
    }
}

#[test]
fn 遗传算法零代时返回初始种群的最优解() {
    let mut rng = StdRng::seed_from_u64(1);
    let 方法 = 遗传算法 {
        generations: 0,
        ..遗传算法::default()
    };
    let mut 目标函数 = 二次函数;
    let 结果 = 方法.优化(&mut 目标函数, &mut rng, &静默界面);
    assert_eq!(结果.种群.len(), 50);
    assert_eq!(结果.最优轨迹, vec![结果.分数]);
    assert_eq!(结果.平均轨迹.len(), 1);
    assert!(结果.种群.iter().all(|x| x.参数.iter().all(|&p| (0.0..2.0).contains(&p))));
}
