use volterra::simulator::{模拟, 积分选项, 积分错误};

fn 等间距(结束: f64, 数量: usize) -> Vec<f64> {
    (0..数量)
        .map(|i| 结束 * i as f64 / (数量 - 1) as f64)
        .collect()
}

#[test]
fn 相同输入得到相同轨迹() {
    let 参数 = [1.0, 0.5, 0.75, 0.25];
    let 时间: Vec<f64> = (0..10).map(|x| x as f64).collect();
    let 选项 = 积分选项::default();
    let 第一次 = 模拟(&参数, [10.0, 5.0], &时间, &选项).unwrap();
    let 第二次 = 模拟(&参数, [10.0, 5.0], &时间, &选项).unwrap();
    assert_eq!(第一次, 第二次);
    assert_eq!(第一次.0.len(), 10);
    assert_eq!(第一次.0[0], 10.0);
    assert_eq!(第一次.1[0], 5.0);
}

#[test]
fn 无相互作用时为指数增长和衰减() {
    let (alpha, gamma) = (0.5, 0.3);
    let 时间 = 等间距(10.0, 11);
    let (猎物, 捕食者) =
        模拟(&[alpha, 0.0, gamma, 0.0], [1.0, 2.0], &时间, &积分选项::default()).unwrap();
    for (i, &t) in 时间.iter().enumerate() {
        let 猎物精确值 = (alpha * t).exp();
        let 捕食者精确值 = 2.0 * (-gamma * t).exp();
        assert!(((猎物[i] - 猎物精确值) / 猎物精确值).abs() < 1e-5);
        assert!(((捕食者[i] - 捕食者精确值) / 捕食者精确值).abs() < 1e-5);
    }
}

#[test]
fn 轨迹保持守恒量() {
    let [alpha, beta, gamma, delta] = [1.0, 0.5, 0.75, 0.25];
    let 守恒量 = |x: f64, y: f64| delta * x - gamma * x.ln() + beta * y - alpha * y.ln();
    let 时间 = 等间距(20.0, 101);
    let (猎物, 捕食者) = 模拟(
        &[alpha, beta, gamma, delta],
        [10.0, 5.0],
        &时间,
        &积分选项::default(),
    )
    .unwrap();
    let 初始 = 守恒量(10.0, 5.0);
    for (x, y) in 猎物.into_iter().zip(捕食者) {
        assert!(x > 0.0 && y > 0.0);
        assert!((守恒量(x, y) - 初始).abs() < 1e-3);
    }
}

#[test]
fn 发散时返回积分错误() {
    let 结果 = 模拟(
        &[10.0, 0.0, 0.0, 0.0],
        [1.0, 1.0],
        &[0.0, 100.0],
        &积分选项::default(),
    );
    assert!(结果.is_err());
}

#[test]
fn 初值非有限时返回积分错误() {
    let 结果 = 模拟(
        &[1.0, 0.5, 0.75, 0.25],
        [f64::NAN, 1.0],
        &[0.0, 1.0],
        &积分选项::default(),
    );
    assert!(matches!(结果, Err(积分错误::非有限值 { .. })));
}

#[test]
fn 步数预算用完时返回积分错误() {
    let 选项 = 积分选项 {
        max_steps: 1,
        first_step: Some(1e-3),
        ..积分选项::default()
    };
    let 结果 = 模拟(&[1.0, 0.5, 0.75, 0.25], [10.0, 5.0], &[0.0, 1.0], &选项);
    assert!(matches!(结果, Err(积分错误::步数超限 { .. })));
}
